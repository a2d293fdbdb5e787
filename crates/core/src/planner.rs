use crate::error::PlanError;
use crate::models::{Budget, BudgetLine, DayPlan, TripPlan, TripRequest};
use crate::request::parse_trip_request;

/// Budget split, in output order. The shares are rounded independently and
/// are allowed to drift from the total.
const BUDGET_SHARES: [(&str, f64); 4] = [
    ("Stay", 0.42),
    ("Food", 0.25),
    ("Sightseeing", 0.18),
    ("Transport", 0.15),
];

const ARRIVAL_DINNER: &str = "Try a relaxed dinner near your stay";
const FOLLOW_UP_DINNER: &str = "Book dinner near the last activity to reduce travel";

pub fn plan_from_json(body: &[u8]) -> Result<TripPlan, PlanError> {
    let request = parse_trip_request(body)?;
    Ok(synthesize_plan(&request))
}

pub fn synthesize_plan(req: &TripRequest) -> TripPlan {
    let duration = req.duration_days.max(1);
    let destination = req.destination_name.as_str();

    let budget = build_budget(req, duration);

    let days = (0..duration)
        .map(|index| build_day(req, index))
        .collect::<Vec<_>>();

    let highlights = vec![
        format!(
            "{}-day {} outline centered on {}",
            duration,
            req.trip_type.outline_label(),
            destination
        ),
        if req.multi_spot {
            "Multi-spot hop enabled—mix city cores and day trips".to_string()
        } else {
            "Single hub makes daily travel light".to_string()
        },
        format!(
            "Budget tuned to a {} traveler profile for ~{} people",
            req.budget_tier.as_str(),
            budget.traveller_count
        ),
    ];

    let add_ons = match req.nearby_points.len() {
        0 => "a few".to_string(),
        count => count.to_string(),
    };

    TripPlan {
        title: format!("{} • {}-day", destination, duration),
        summary: format!(
            "Serverless plan for {}: {} days with {} add-ons, tailored for {}.",
            destination,
            duration,
            add_ons,
            req.party_size.as_str()
        ),
        start_date: req.start_date.clone(),
        end_date: req.end_date.clone(),
        highlights,
        budget,
        days,
        transport_mode: req.transport_mode.clone(),
        transport_tip: req.transport_mode.tip().to_string(),
    }
}

fn build_budget(req: &TripRequest, duration: u32) -> Budget {
    let per_day_rate = req.budget_tier.per_day_rate();
    let traveller_count = req.party_size.traveller_count();
    let total = (f64::from(per_day_rate) * f64::from(duration) * traveller_count).round() as i64;

    let breakdown = BUDGET_SHARES
        .iter()
        .map(|(label, share)| BudgetLine {
            label: (*label).to_string(),
            amount: (total as f64 * share).round() as i64,
        })
        .collect();

    Budget {
        total,
        per_day_rate,
        traveller_count,
        breakdown,
    }
}

// Day `index` takes nearby point `index - 1`, purely by position.
fn build_day(req: &TripRequest, index: u32) -> DayPlan {
    let destination = req.destination_name.as_str();

    let (focus, summary, dinner) = if index == 0 {
        (
            format!("Arrive in {}", destination),
            format!(
                "Land in {}, settle into your stay, and take an easy walk to a nearby cafe.",
                destination
            ),
            ARRIVAL_DINNER,
        )
    } else {
        match req
            .nearby_points
            .get(index as usize - 1)
            .and_then(|point| point.usable_name())
        {
            Some(spot) => (
                format!("Explore {}", spot),
                format!(
                    "Spend the day at {}, plan a lunch stop, and leave room for golden-hour photos.",
                    spot
                ),
                FOLLOW_UP_DINNER,
            ),
            None => (
                "Local discoveries".to_string(),
                "Ask locals for a neighborhood walk or market—keep it flexible and photo-friendly."
                    .to_string(),
                FOLLOW_UP_DINNER,
            ),
        }
    };

    DayPlan {
        day_number: index + 1,
        focus,
        summary,
        dinner_suggestion: dinner.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BudgetTier, NearbyPoint, PartySize, TransportMode, TripType};

    fn paris() -> TripRequest {
        TripRequest {
            duration_days: 3,
            ..TripRequest::new("Paris")
        }
    }

    #[test]
    fn paris_couple_mid_public() {
        let plan = synthesize_plan(&paris());

        assert_eq!(plan.title, "Paris • 3-day");
        assert_eq!(plan.budget.total, 840);
        assert_eq!(plan.budget.per_day_rate, 140);
        let amounts = plan
            .budget
            .breakdown
            .iter()
            .map(|line| (line.label.as_str(), line.amount))
            .collect::<Vec<_>>();
        assert_eq!(
            amounts,
            vec![
                ("Stay", 353),
                ("Food", 210),
                ("Sightseeing", 151),
                ("Transport", 126)
            ]
        );

        let focuses = plan.days.iter().map(|d| d.focus.as_str()).collect::<Vec<_>>();
        assert_eq!(
            focuses,
            vec!["Arrive in Paris", "Local discoveries", "Local discoveries"]
        );
        assert_eq!(plan.transport_tip, TransportMode::Public.tip());
        assert_eq!(
            plan.summary,
            "Serverless plan for Paris: 3 days with a few add-ons, tailored for couple."
        );
    }

    #[test]
    fn days_are_numbered_in_order() {
        for duration in [1, 2, 7, 30] {
            let plan = synthesize_plan(&TripRequest {
                duration_days: duration,
                ..paris()
            });
            assert_eq!(plan.days.len(), duration as usize);
            for (index, day) in plan.days.iter().enumerate() {
                assert_eq!(day.day_number, index as u32 + 1);
            }
        }
    }

    #[test]
    fn zero_duration_still_yields_arrival_day() {
        let plan = synthesize_plan(&TripRequest {
            duration_days: 0,
            ..paris()
        });
        assert_eq!(plan.days.len(), 1);
        assert_eq!(plan.days[0].dinner_suggestion, ARRIVAL_DINNER);
    }

    #[test]
    fn nearby_points_map_to_days_by_position() {
        let plan = synthesize_plan(&TripRequest {
            duration_days: 4,
            nearby_points: vec![
                NearbyPoint::named("Louvre"),
                NearbyPoint::named(""),
                NearbyPoint::named("Versailles"),
                NearbyPoint::named("Never reached"),
            ],
            ..paris()
        });

        assert_eq!(plan.days[1].focus, "Explore Louvre");
        assert!(plan.days[1].summary.contains("Louvre"));
        assert_eq!(plan.days[2].focus, "Local discoveries");
        assert_eq!(plan.days[3].focus, "Explore Versailles");
        assert!(plan.days[1..]
            .iter()
            .all(|day| day.dinner_suggestion == FOLLOW_UP_DINNER));
        assert!(plan.summary.contains("with 4 add-ons"));
    }

    #[test]
    fn family_high_budget_keeps_rounding_drift() {
        let plan = synthesize_plan(&TripRequest {
            duration_days: 5,
            party_size: PartySize::Family,
            budget_tier: BudgetTier::High,
            ..paris()
        });

        assert_eq!(plan.budget.total, 4200);
        assert_eq!(plan.budget.traveller_count, 3.5);
        for (line, (_, share)) in plan.budget.breakdown.iter().zip(BUDGET_SHARES) {
            assert_eq!(line.amount, (4200.0 * share).round() as i64);
        }
        assert_eq!(
            plan.highlights[2],
            "Budget tuned to a high traveler profile for ~3.5 people"
        );
    }

    #[test]
    fn solo_low_budget_rounds_total() {
        let plan = synthesize_plan(&TripRequest {
            duration_days: 1,
            party_size: PartySize::Solo,
            budget_tier: BudgetTier::Low,
            ..paris()
        });
        assert_eq!(plan.budget.total, 80);
        let sum: i64 = plan.budget.breakdown.iter().map(|line| line.amount).sum();
        assert_eq!(sum, 34 + 20 + 14 + 12);
    }

    #[test]
    fn highlights_follow_trip_flags() {
        let plan = synthesize_plan(&TripRequest {
            trip_type: TripType::International,
            multi_spot: true,
            ..paris()
        });
        assert_eq!(
            plan.highlights[0],
            "3-day international outline centered on Paris"
        );
        assert_eq!(
            plan.highlights[1],
            "Multi-spot hop enabled—mix city cores and day trips"
        );

        let plan = synthesize_plan(&paris());
        assert_eq!(plan.highlights[0], "3-day local outline centered on Paris");
        assert_eq!(plan.highlights[1], "Single hub makes daily travel light");
        assert_eq!(
            plan.highlights[2],
            "Budget tuned to a mid traveler profile for ~2 people"
        );
    }

    #[test]
    fn transport_tip_groups_non_transit_modes() {
        let flight = TransportMode::Flight.tip();
        let public = TransportMode::Public.tip();
        for mode in ["own", "rental", "taxi", "hovercraft"] {
            let plan = synthesize_plan(&TripRequest {
                transport_mode: TransportMode::parse(mode),
                ..paris()
            });
            assert_ne!(plan.transport_tip, flight);
            assert_ne!(plan.transport_tip, public);
            assert_eq!(plan.transport_mode.as_str(), mode);
        }
    }

    #[test]
    fn plan_from_json_matches_typed_path() {
        let body = br#"{"destinationName":"Paris","durationDays":3,"partySize":"couple","budgetTier":"mid","transportMode":"public","nearbyPoints":[]}"#;
        assert_eq!(plan_from_json(body).unwrap(), synthesize_plan(&paris()));
    }

    #[test]
    fn unknown_categories_behave_like_defaults() {
        let unknown = plan_from_json(
            br#"{"destinationName":"Paris","durationDays":3,"partySize":"crowd","budgetTier":"luxury"}"#,
        )
        .unwrap();
        assert_eq!(unknown, synthesize_plan(&paris()));
    }

    #[test]
    fn durations_past_a_year_get_every_day() {
        let plan =
            plan_from_json(br#"{"destinationName":"Paris","durationDays":400}"#).unwrap();
        assert_eq!(plan.title, "Paris • 400-day");
        assert_eq!(plan.days.len(), 400);
        assert_eq!(plan.days[399].day_number, 400);
    }

    #[test]
    fn synthesis_is_deterministic() {
        let request = TripRequest {
            nearby_points: vec![NearbyPoint::named("Montmartre")],
            ..paris()
        };
        assert_eq!(synthesize_plan(&request), synthesize_plan(&request));
    }
}
