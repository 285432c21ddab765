use super::marker::{Condition, extract_condition};
use super::merge::MergedChoiceSet;
use super::registry::PredicateRegistry;
use crate::expr::{ConditionEvaluator, expand_shorthand};

/// A visible choice.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChoiceEntry {
    /// Value handed back when this entry is chosen.
    pub slot: usize,
    /// Display text, markers removed.
    pub text: String,
    pub condition: Option<Condition>,
    pub enabled: bool,
}

/// Decides which merged choices are shown.
///
/// Conditions that cannot be evaluated, and names missing from the
/// registry, leave the choice visible.
pub struct ChoiceFilter<'a> {
    registry: &'a PredicateRegistry,
    evaluator: &'a dyn ConditionEvaluator,
}

impl<'a> ChoiceFilter<'a> {
    pub fn new(registry: &'a PredicateRegistry, evaluator: &'a dyn ConditionEvaluator) -> Self {
        Self { registry, evaluator }
    }

    pub fn is_visible(&self, condition: &Condition) -> bool {
        let source = match condition {
            Condition::Expression(src) => src.as_str(),
            Condition::Named(name) => match self.registry.get(name) {
                Some(src) => src,
                None => {
                    tracing::warn!(name, "predefined condition not found; showing choice");
                    return true;
                }
            },
        };
        let formula = expand_shorthand(source);
        match self.evaluator.evaluate(&formula) {
            Ok(visible) => visible,
            Err(error) => {
                tracing::warn!(%formula, %error, "condition failed to evaluate; showing choice");
                true
            }
        }
    }

    /// Visible entries in their original order, slots untouched.
    pub fn filter_visible(&self, set: &MergedChoiceSet) -> Vec<ChoiceEntry> {
        set.entries
            .iter()
            .filter_map(|raw| {
                let (text, condition) = extract_condition(&raw.text);
                if let Some(cond) = &condition {
                    if !self.is_visible(cond) {
                        tracing::debug!(slot = raw.slot, "choice hidden");
                        return None;
                    }
                }
                Some(ChoiceEntry { slot: raw.slot, text, condition, enabled: true })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::choice::merge::{CancelType, RawChoiceBlock, merge_blocks};
    use crate::expr::ExprError;

    fn set() -> MergedChoiceSet {
        merge_blocks(
            &[RawChoiceBlock::new([r"\cc[s1]Yes", "No", r"\cc[:rich]Bribe"], CancelType::Disallow)],
            5,
        )
    }

    #[test]
    fn evaluator_sees_expanded_shorthand() {
        let registry = PredicateRegistry::default();
        let seen = std::cell::RefCell::new(Vec::new());
        let ev = |src: &str| -> Result<bool, ExprError> {
            seen.borrow_mut().push(src.to_string());
            Ok(true)
        };
        ChoiceFilter::new(&registry, &ev).filter_visible(&set());
        assert_eq!(seen.borrow()[0], "switches[1]");
    }

    #[test]
    fn false_conditions_hide_keeping_slots() {
        let registry: PredicateRegistry = [("rich", "p.gold > 9000")].into_iter().collect();
        let ev = |src: &str| -> Result<bool, ExprError> { Ok(src != "switches[1]") };
        let visible = ChoiceFilter::new(&registry, &ev).filter_visible(&set());
        let slots: Vec<usize> = visible.iter().map(|e| e.slot).collect();
        assert_eq!(slots, vec![1, 2]);
        assert_eq!(visible[1].text, "Bribe");
    }

    #[test]
    fn unknown_name_and_errors_fail_open() {
        let registry = PredicateRegistry::default();
        let ev = |_: &str| -> Result<bool, ExprError> { Err(ExprError::DivisionByZero) };
        let visible = ChoiceFilter::new(&registry, &ev).filter_visible(&set());
        assert_eq!(visible.len(), 3);
    }
}
