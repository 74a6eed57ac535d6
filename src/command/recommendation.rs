//! Recommendation commands.
//!
//! Recommendations always belong to the evaluating context, never to the
//! context a hop prefix names. A subcoach reads and writes the bucket its
//! parent keeps for that instance, so the parent sees everything its
//! subcoaches recommend.

use std::sync::Arc;

use crate::{
    ast::Atom,
    context::{Recommendation, RecommendationStore, RecommendationTag},
    eval::EvalResult,
};

use super::{Arity, Command, CommandCall, CommandRegistry};

pub fn register(registry: &mut CommandRegistry) {
    registry.register(AddRecommendation);
    registry.register(RemoveRecommendation);
    registry.register(HasRecommendation);
}

fn bucket(call: &CommandCall<'_>) -> Arc<RecommendationStore> {
    call.cx.execution.recommendation_target()
}

/// `addRecommendation(id, order, title, text, [tags])`. Tags are a
/// comma-separated list of `label:category:color`.
pub struct AddRecommendation;

impl Command for AddRecommendation {
    fn name(&self) -> &str {
        "addRecommendation"
    }

    fn arity(&self) -> Arity {
        Arity::Range(4, 5)
    }

    fn execute(&self, args: &[Atom], call: &CommandCall<'_>) -> EvalResult<Atom> {
        let id = call.text(args, 0, "id")?;
        let order = call.integer(args, 1, "order")?;
        let title = call.text(args, 2, "title")?;
        let text = call.text(args, 3, "text")?;
        let tags = if args.len() == 5 {
            RecommendationTag::parse_list(&call.text(args, 4, "tags")?)
        } else {
            Vec::new()
        };
        bucket(call).add(Recommendation {
            id,
            order,
            title,
            text,
            tags,
            instance: call.cx.execution.active_instance().map(str::to_string),
        });
        Ok(Atom::Bool(true))
    }
}

/// `removeRecommendation(id)`; returns whether it was present.
pub struct RemoveRecommendation;

impl Command for RemoveRecommendation {
    fn name(&self) -> &str {
        "removeRecommendation"
    }

    fn arity(&self) -> Arity {
        Arity::Exact(1)
    }

    fn execute(&self, args: &[Atom], call: &CommandCall<'_>) -> EvalResult<Atom> {
        let id = call.text(args, 0, "id")?;
        Ok(bucket(call).remove(&id).into())
    }
}

pub struct HasRecommendation;

impl Command for HasRecommendation {
    fn name(&self) -> &str {
        "hasRecommendation"
    }

    fn arity(&self) -> Arity {
        Arity::Exact(1)
    }

    fn execute(&self, args: &[Atom], call: &CommandCall<'_>) -> EvalResult<Atom> {
        let id = call.text(args, 0, "id")?;
        Ok(bucket(call).contains(&id).into())
    }
}
