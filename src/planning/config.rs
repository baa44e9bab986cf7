//! The race configuration matrix for one raceclass group.

use crate::models::event::Raceclass;
use crate::models::format::{IndividualSprintFormat, RaceConfig, RaceRule};
use crate::planning::PlanError;

/// Per-group view over the competition format's race configuration.
///
/// A group shares its `ranking` flag, so one matrix serves every
/// raceclass in it; the row for a raceclass is the first one whose
/// capacity covers its contestant count. Constructed fresh per group and
/// passed by reference.
pub struct ConfigMatrix<'a> {
    rounds: &'a [String],
    configs: &'a [RaceConfig],
}

impl<'a> ConfigMatrix<'a> {
    pub fn for_group(
        format: &'a IndividualSprintFormat,
        group: &[&Raceclass],
    ) -> Result<Self, PlanError> {
        let ranking = group.first().map(|rc| rc.ranking).unwrap_or(true);

        let (rounds, configs) = if ranking {
            (
                format.rounds_ranked_classes.as_slice(),
                format
                    .race_config_ranked
                    .as_deref()
                    .ok_or(PlanError::MissingProperty("race_config_ranked"))?,
            )
        } else {
            (
                format.rounds_non_ranked_classes.as_slice(),
                format
                    .race_config_non_ranked
                    .as_deref()
                    .ok_or(PlanError::MissingProperty("race_config_non_ranked"))?,
            )
        };

        Ok(Self { rounds, configs })
    }

    /// The rounds the group's classes race, e.g. ["Q", "S", "F"].
    pub fn rounds(&self) -> &'a [String] {
        self.rounds
    }

    fn row(&self, raceclass: &Raceclass) -> Result<&'a RaceConfig, PlanError> {
        self.configs
            .iter()
            .find(|row| raceclass.no_of_contestants <= row.max_no_of_contestants)
            .ok_or(PlanError::UnsupportedNoOfContestants(
                raceclass.no_of_contestants,
            ))
    }

    /// The rounds this raceclass actually participates in.
    pub fn rounds_in_raceclass(&self, raceclass: &Raceclass) -> Result<&'a [String], PlanError> {
        Ok(&self.row(raceclass)?.rounds)
    }

    /// The indexes of a round in declared (tier) order; empty when the
    /// raceclass sits the round out.
    pub fn race_indexes(
        &self,
        raceclass: &Raceclass,
        round: &str,
    ) -> Result<Vec<&'a str>, PlanError> {
        let row = self.row(raceclass)?;
        Ok(row
            .no_of_heats
            .get(round)
            .map(|indexes| indexes.keys().map(String::as_str).collect())
            .unwrap_or_default())
    }

    pub fn no_of_heats(
        &self,
        raceclass: &Raceclass,
        round: &str,
        index: &str,
    ) -> Result<u32, PlanError> {
        let row = self.row(raceclass)?;
        Ok(row
            .no_of_heats
            .get(round)
            .and_then(|indexes| indexes.get(index))
            .copied()
            .unwrap_or(0))
    }

    /// The advancement rule of races in (round, index); empty when the
    /// round has no outgoing rule (finals).
    pub fn rule_from_to(
        &self,
        raceclass: &Raceclass,
        round: &str,
        index: &str,
    ) -> Result<RaceRule, PlanError> {
        let row = self.row(raceclass)?;
        Ok(row
            .from_to
            .get(round)
            .and_then(|indexes| indexes.get(index))
            .cloned()
            .unwrap_or_default())
    }
}
