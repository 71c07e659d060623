use multirando_game::{EntranceIdx, LocationIdx, Rule};

use crate::graph::WorldGraph;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RuleTarget {
    Entrance(EntranceIdx),
    Location(LocationIdx),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum Combinator {
    #[default]
    And,
    Or,
}

impl WorldGraph {
    fn rule_slot(&mut self, target: RuleTarget) -> &mut Option<Rule> {
        match target {
            RuleTarget::Entrance(e) => &mut self.entrances[e].rule,
            RuleTarget::Location(l) => &mut self.locations[l].rule,
        }
    }

    pub fn get_rule(&self, target: RuleTarget) -> Option<&Rule> {
        match target {
            RuleTarget::Entrance(e) => self.entrances[e].rule.as_ref(),
            RuleTarget::Location(l) => self.locations[l].rule.as_ref(),
        }
    }

    /// Composes `rule` with the target's existing rule. A target without a rule
    /// takes `rule` as is, whichever combinator is given.
    pub fn add_rule(&mut self, target: RuleTarget, rule: Rule, combinator: Combinator) {
        let slot = self.rule_slot(target);
        *slot = Some(match slot.take() {
            None => rule,
            Some(old) => match combinator {
                Combinator::And => Rule::make_and(vec![old, rule]),
                Combinator::Or => Rule::make_or(vec![old, rule]),
            },
        });
    }

    pub fn set_rule(&mut self, target: RuleTarget, rule: Rule) {
        *self.rule_slot(target) = Some(rule);
    }

    /// Gates `target` on the live rule of location `source`: later edits to the
    /// source rule are seen by the target too.
    pub fn copy_location_rule(&mut self, target: RuleTarget, source: LocationIdx) {
        self.add_rule(target, Rule::LocationRule(source), Combinator::And);
    }

    /// Snapshot of the current rule, `Free` when none is attached.
    pub fn rule_or_free(&self, target: RuleTarget) -> Rule {
        self.get_rule(target).cloned().unwrap_or(Rule::Free)
    }
}
