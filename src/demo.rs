//! Bundled Madison demo routes, served when no directions provider is wired up.

use once_cell::sync::Lazy;

use crate::route::Route;

static DEMO_ROUTES: Lazy<Vec<Route>> = Lazy::new(|| {
    let raw = include_str!("../data/demo_routes.json");
    serde_json::from_str(raw).expect("valid demo routes")
});

/// Fresh copy of the demo set; callers may reorder or decorate it freely.
pub fn demo_routes() -> Vec<Route> {
    DEMO_ROUTES.clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze::weights::ScoreWeights;
    use crate::engine::evaluate_routes;

    #[test]
    fn demo_set_loads() {
        let routes = demo_routes();
        let ids: Vec<&str> = routes.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["river-greenway", "campus-protected", "neighborhood-green"]);
        assert_eq!(routes[0].metrics.safety, Some(95.0));
        assert_eq!(routes[2].mode.as_deref(), Some("walk"));
        assert_eq!(routes[1].coordinates.len(), 6);
    }

    #[test]
    fn only_community_incidents_count_as_notes() {
        let routes = demo_routes();
        assert_eq!(
            routes[0].community_notes(),
            vec!["Neighbors report low traffic after 7pm."]
        );
        assert!(routes[1].community_notes().is_empty());
        assert!(routes[2].community_notes().is_empty());
    }

    #[test]
    fn river_greenway_is_recommended() {
        let e = evaluate_routes(&demo_routes(), &ScoreWeights::default(), None);
        let rec = e.recommendation.unwrap();
        assert_eq!(rec.route_id, "river-greenway");
        // notes 63, weather 55 (no forecast), metrics 90
        assert_eq!(rec.score, 66);
        assert_eq!(
            rec.rationale,
            "Notes trend neutral (63/100) · Weather looks unknown (55/100)"
        );
    }
}
