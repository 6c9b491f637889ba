//! Behavioural properties of the calculator across a spread of profiles.
//!
//! The unit tests next to each worksheet pin individual lines; these check
//! the relationships that must hold for any valid input.

use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use solar_core::{BreakEven, Scheme, SizingInput, compute};

/// A handful of load/location profiles with awkward, non-round values.
fn profiles() -> Vec<SizingInput> {
    let loads = [dec!(0.35), dec!(1.5), dec!(4.2), dec!(17.75)];
    let sun_hours = [dec!(2.1), dec!(3.8), dec!(5.65)];
    let losses = [dec!(0), dec!(14), dec!(20), dec!(37.5)];

    let mut inputs = Vec::new();
    for load in loads {
        for psh in sun_hours {
            for loss in losses {
                inputs.push(SizingInput {
                    average_load_kw: load,
                    operating_hours_per_day: dec!(13),
                    peak_sun_hours: psh,
                    system_loss_percent: loss,
                    panel_rated_watts: dec!(415),
                    battery_voltage: dec!(51.2),
                    battery_capacity_ah: dec!(105),
                    depth_of_discharge_percent: dec!(90),
                    ..Default::default()
                });
            }
        }
    }
    inputs
}

#[test]
fn installed_capacity_never_below_requirement() {
    for input in profiles() {
        let estimate = compute(&input).unwrap();

        assert!(
            estimate.array.installed_kwp >= estimate.array.required_kwp,
            "under-provisioned: {} < {}",
            estimate.array.installed_kwp,
            estimate.array.required_kwp
        );
    }
}

#[test]
fn stand_alone_batteries_cover_full_daily_demand() {
    for input in profiles() {
        let estimate = compute(&input).unwrap();
        let stored =
            Decimal::from(estimate.stand_alone.battery_count) * estimate.usable_battery_kwh;

        assert!(stored >= estimate.energy.daily_kwh);
    }
}

#[test]
fn hybrid_batteries_grow_with_savings_target() {
    let mut previous = 0;
    for percent in [0, 10, 25, 40, 55, 70, 85, 100] {
        let input = SizingInput {
            hybrid_savings_percent: Decimal::from(percent),
            ..Default::default()
        };

        let count = compute(&input).unwrap().hybrid.battery_count;

        assert!(
            count >= previous,
            "battery count fell from {previous} to {count} at {percent}%"
        );
        previous = count;
    }
}

#[test]
fn hybrid_without_savings_target_has_no_batteries() {
    let input = SizingInput {
        hybrid_savings_percent: dec!(0),
        ..Default::default()
    };

    let estimate = compute(&input).unwrap();

    assert_eq!(estimate.hybrid.battery_count, 0);
    assert_eq!(estimate.hybrid.capex.battery_cost, dec!(0));
}

#[test]
fn grid_tied_never_uses_batteries() {
    for input in profiles() {
        assert_eq!(compute(&input).unwrap().grid_tied.battery_count, 0);
    }
}

#[test]
fn stand_alone_costs_at_least_grid_tied() {
    for input in profiles() {
        let estimate = compute(&input).unwrap();

        assert!(estimate.stand_alone.capex.total >= estimate.grid_tied.capex.total);
    }
}

#[test]
fn schemes_share_the_same_array() {
    let estimate = compute(&SizingInput::default()).unwrap();

    // Only the battery bank and costs differ; the panel design is common.
    let base = estimate.grid_tied.capex.base_installation;
    assert_eq!(estimate.stand_alone.capex.base_installation, base);
    assert_eq!(estimate.hybrid.capex.base_installation, base);
}

#[test]
fn zero_savings_gives_break_even_sentinel() {
    let input = SizingInput {
        grid_tied_savings_percent: dec!(0),
        hybrid_savings_percent: dec!(0),
        ..Default::default()
    };

    let estimate = compute(&input).unwrap();

    for scheme in [Scheme::GridTied, Scheme::Hybrid] {
        let result = estimate.scheme(scheme);
        assert_eq!(result.break_even, BreakEven::NotReached);
        assert_eq!(result.break_even.years_or_zero(), dec!(0));
    }
    assert!(estimate.stand_alone.break_even.is_reached());
}

#[test]
fn repeated_calls_are_identical() {
    for input in profiles() {
        let first = compute(&input).unwrap();
        let second = compute(&input).unwrap();

        assert_eq!(first, second);
    }
}

#[test]
fn concurrent_callers_agree() {
    let input = SizingInput::default();
    let expected = compute(&input).unwrap();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let input = input.clone();
            std::thread::spawn(move || compute(&input).unwrap())
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}

// =========================================================================
// Worked examples
// =========================================================================

#[test]
fn example_daily_energy_and_panels() {
    let estimate = compute(&SizingInput::default()).unwrap();

    assert_eq!(estimate.energy.daily_kwh, dec!(36));
    assert_eq!(estimate.array.required_kwp.round_dp(2), dec!(11.84));
    assert_eq!(estimate.array.panel_count, 22);
}

#[test]
fn example_baseline_bill() {
    let estimate = compute(&SizingInput::default()).unwrap();

    assert_eq!(estimate.energy.monthly_kwh, dec!(1080));
    assert_eq!(estimate.energy.monthly_bill, dec!(1559520));
}

#[test]
fn example_battery_bank() {
    let estimate = compute(&SizingInput::default()).unwrap();

    assert_eq!(estimate.usable_battery_kwh, dec!(3.84));
    assert_eq!(estimate.stand_alone.battery_count, 10);
}

// ---------------------------------------------------------------------------
// Extreme magnitudes: every case must come back as an error, never a panic.
// ---------------------------------------------------------------------------

fn extreme_profiles() -> Vec<(&'static str, SizingInput)> {
    let huge = dec!(1000000000000000);
    let tiny = dec!(0.0000000000000000000000001);

    vec![
        (
            "huge load and tariff",
            SizingInput {
                average_load_kw: huge,
                grid_tariff: huge,
                ..Default::default()
            },
        ),
        (
            "huge price per kWp",
            SizingInput {
                price_per_kwp: dec!(10000000000000000000000000000),
                ..Default::default()
            },
        ),
        (
            "huge battery price",
            SizingInput {
                battery_unit_price: Decimal::MAX,
                ..Default::default()
            },
        ),
        (
            "vanishing battery ratings",
            SizingInput {
                battery_voltage: tiny,
                battery_capacity_ah: tiny,
                ..Default::default()
            },
        ),
        (
            "tiny battery capacity",
            SizingInput {
                battery_capacity_ah: dec!(0.0000000000000000001),
                ..Default::default()
            },
        ),
        (
            "vanishing sun hours",
            SizingInput {
                peak_sun_hours: dec!(0.0000000000000000000000000001),
                ..Default::default()
            },
        ),
        (
            "huge load",
            SizingInput {
                average_load_kw: Decimal::MAX,
                ..Default::default()
            },
        ),
    ]
}

#[test]
fn extreme_inputs_fail_without_panicking() {
    for (label, input) in extreme_profiles() {
        let outcome = std::panic::catch_unwind(|| compute(&input));

        match outcome {
            Ok(result) => assert!(result.is_err(), "{label}: expected an error"),
            Err(_) => panic!("{label}: compute panicked"),
        }
    }
}

#[test]
fn large_but_representable_inputs_still_compute() {
    let input = SizingInput {
        average_load_kw: dec!(100000),
        grid_tariff: dec!(100000),
        ..Default::default()
    };

    let estimate = compute(&input).expect("a large plant is still representable");

    assert!(estimate.array.installed_kwp >= estimate.array.required_kwp);
    assert!(estimate.stand_alone.capex.total >= estimate.grid_tied.capex.total);
}
