//! Raceplan consistency validation.

use std::collections::BTreeMap;

use crate::models::event::Raceclass;
use crate::models::format::CompetitionFormat;
use crate::models::race::Race;
use crate::models::raceplan::Raceplan;

/// Check a raceplan and its races for consistency.
///
/// Findings are keyed by race `order`; key 0 collects plan-level
/// findings. An empty map means the plan is consistent.
pub fn validate_raceplan(
    raceplan: &Raceplan,
    races: &[Race],
    format: &CompetitionFormat,
    raceclasses: &[Raceclass],
) -> BTreeMap<u32, Vec<String>> {
    let mut results: BTreeMap<u32, Vec<String>> = BTreeMap::new();

    let mut races: Vec<&Race> = races.iter().collect();
    races.sort_by_key(|race| race.order());

    // Start times must not step backwards through the program:
    for pair in races.windows(2) {
        if pair[0].start_time() >= pair[1].start_time() {
            results
                .entry(pair[1].order())
                .or_default()
                .push("Start time is not in chronological order.".to_string());
        }
    }

    let first_rounds: Vec<&str> = match format {
        CompetitionFormat::IndividualSprint(f) => f
            .rounds_ranked_classes
            .first()
            .into_iter()
            .chain(f.rounds_non_ranked_classes.first())
            .map(String::as_str)
            .collect(),
        CompetitionFormat::IntervalStart(_) => Vec::new(),
    };

    // Every race needs contestants; first-round races carry the plan total:
    let mut sum_no_of_contestants: u32 = 0;
    for race in &races {
        if race.no_of_contestants() == 0 {
            results
                .entry(race.order())
                .or_default()
                .push("Race has no contestants.".to_string());
        }

        match race {
            Race::IndividualSprint(race) => {
                if first_rounds.contains(&race.round.as_str()) {
                    sum_no_of_contestants += race.no_of_contestants;
                }
            }
            Race::IntervalStart(race) => sum_no_of_contestants += race.no_of_contestants,
        }
    }

    if sum_no_of_contestants != raceplan.no_of_contestants {
        results.entry(0).or_default().push(format!(
            "The sum of contestants in races ({sum_no_of_contestants}) is not equal \
             to the number of contestants in the raceplan ({}).",
            raceplan.no_of_contestants
        ));
    }

    let no_of_contestants_in_raceclasses: u32 =
        raceclasses.iter().map(|rc| rc.no_of_contestants).sum();
    if raceplan.no_of_contestants != no_of_contestants_in_raceclasses {
        results.entry(0).or_default().push(format!(
            "Number of contestants in raceplan ({}) is not equal to the number \
             of contestants in the raceclasses ({no_of_contestants_in_raceclasses}).",
            raceplan.no_of_contestants
        ));
    }

    results
}
