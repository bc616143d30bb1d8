//! Balance simulator for the progression curve.
//! Run with: cargo test simulate_greedy -- --nocapture

#[cfg(test)]
mod tests {
    use crate::engine::catalog::Catalog;
    use crate::engine::logic;
    use crate::engine::state::ProgressionState;
    use crate::format::format_magnitude;

    const CLICKS_PER_SECOND: u32 = 5;

    /// Expected energy per second at the current state: auto-generation
    /// plus clicks at a steady rate, crits folded in as expectation.
    fn income_per_second(state: &ProgressionState, catalog: &Catalog) -> f64 {
        let chance = state.critical_chance(catalog);
        let factor = state.critical_factor(catalog);
        let click_yield = state.per_action_yield
            * state.click_bonus(catalog)
            * state.global_multiplier(catalog)
            * (1.0 + chance * (factor - 1.0));
        state.auto_yield_per_second(catalog) + click_yield * CLICKS_PER_SECOND as f64
    }

    /// Find the affordable purchase with the shortest payback time.
    fn find_best_purchase(state: &ProgressionState, catalog: &Catalog) -> Option<String> {
        let base_income = income_per_second(state, catalog);
        let mut best: Option<(f64, String)> = None;

        for item in catalog.items() {
            let cost = match logic::current_cost(state, catalog, &item.id) {
                Some(c) if c <= state.balance => c,
                _ => continue,
            };
            if let Some(cap) = state.effective_cap(catalog, &item.id) {
                if state.level(&item.id) >= cap {
                    continue;
                }
            }

            // Hypothetical: one more level, flat yield baked in
            let mut next = state.clone();
            next.levels.insert(item.id.clone(), next.level(&item.id) + 1);
            if item.effect == crate::engine::catalog::EffectKind::FlatYieldMultiplier {
                next.per_action_yield *= item.magnitude;
            }
            let gain = income_per_second(&next, catalog) - base_income;

            let payback = if gain > 0.0 {
                cost / gain
            } else {
                // Cap expanders and discounts: no direct income, low priority
                cost / base_income.max(1e-9) * 100.0
            };
            let dominated = best.as_ref().map_or(false, |(bp, _)| *bp <= payback);
            if !dominated {
                best = Some((payback, item.id.clone()));
            }
        }

        best.map(|(_, id)| id)
    }

    fn report_stats(state: &ProgressionState, catalog: &Catalog, seconds: u32, purchases: u32) {
        eprintln!("┌─── {}m{}s ─────────────────────────", seconds / 60, seconds % 60);
        eprintln!(
            "│ Balance: {}  Lifetime: {}  Clicks: {}",
            format_magnitude(state.balance),
            format_magnitude(state.lifetime_earned),
            state.total_clicks
        );
        eprintln!(
            "│ Income: {}/s  Global: x{}  Prestige: {}",
            format_magnitude(income_per_second(state, catalog)),
            format_magnitude(state.global_multiplier(catalog)),
            state.prestige_count
        );
        let owned: Vec<String> = catalog
            .items()
            .iter()
            .filter(|i| state.level(&i.id) > 0)
            .map(|i| format!("{}:{}", i.id, state.level(&i.id)))
            .collect();
        eprintln!("│ Owned ({}): {}", purchases, owned.join("  "));
        eprintln!("└────────────────────────────────────");
    }

    /// Simulate greedy play for `total_seconds`, prestiging when possible.
    /// Returns total energy earned across all runs.
    fn simulate(total_seconds: u32) -> f64 {
        let catalog = Catalog::standard();
        let mut state = ProgressionState::new();
        let mut total_purchases: u32 = 0;
        let mut prestiges: u32 = 0;
        let mut earned_total = 0.0;

        let report_times = [60, 300, 600, 1200, 1800, 2700, 3600];
        let mut next_report = 0;

        eprintln!("\n========================================");
        eprintln!("  Greedy balance simulation: {} min", total_seconds / 60);
        eprintln!("  Click rate: {}/s", CLICKS_PER_SECOND);
        eprintln!("========================================\n");

        for second in 1..=total_seconds {
            for _ in 0..CLICKS_PER_SECOND {
                earned_total += logic::click(&mut state, &catalog).gained;
            }
            earned_total += logic::tick(&mut state, &catalog, 1.0);

            if logic::prestige(&mut state).is_ok() {
                prestiges += 1;
                eprintln!("★ prestige #{} at {}s", prestiges, second);
            }

            // Greedy: keep buying the best payback until nothing fits
            for _ in 0..20 {
                match find_best_purchase(&state, &catalog) {
                    Some(id) => {
                        if logic::purchase(&mut state, &catalog, &id).is_ok() {
                            total_purchases += 1;
                        } else {
                            break;
                        }
                    }
                    None => break,
                }
            }

            if next_report < report_times.len() && second >= report_times[next_report] {
                report_stats(&state, &catalog, second, total_purchases);
                next_report += 1;
            }
        }

        eprintln!("\n======== final ========");
        report_stats(&state, &catalog, total_seconds, total_purchases);
        eprintln!(
            "earned: {}  purchases: {}  prestiges: {}",
            format_magnitude(earned_total),
            total_purchases,
            prestiges
        );
        earned_total
    }

    #[test]
    fn simulate_greedy_30min() {
        // A player clicking steadily for 30 minutes must be well past the
        // early planets
        assert!(simulate(1800) > 10_000.0);
    }

    #[test]
    fn simulate_greedy_1hour() {
        assert!(simulate(3600) > 100_000.0);
    }
}
