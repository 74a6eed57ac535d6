mod gamification;
mod questionnaire;
mod subcoach;
