//! Integration tests for position categorization through the library
//! surface.

use vigil::services::categorize;
use vigil::types::{Position, Side};

fn make_position(symbol: &str, pnl: f64) -> Position {
    Position {
        symbol: symbol.to_string(),
        pnl,
        roi: 0.0,
        side: Side::Long,
        size: 1.0,
        max_profit: pnl.max(0.0),
        max_loss: pnl.min(0.0),
    }
}

#[test]
fn test_reference_categorization() {
    let positions = vec![
        make_position("A", 500.0),
        make_position("B", 50.0),
        make_position("C", -10.0),
        make_position("D", 200.0),
        make_position("E", -300.0),
    ];

    let result = categorize(&positions, 100.0);

    let high: Vec<&str> = result
        .buckets
        .high_profitable
        .iter()
        .map(|p| p.symbol.as_str())
        .collect();
    assert_eq!(high, vec!["A", "D"]);

    let profitable: Vec<&str> = result
        .buckets
        .profitable
        .iter()
        .map(|p| p.symbol.as_str())
        .collect();
    assert_eq!(profitable, vec!["B"]);

    let losing: Vec<&str> = result
        .buckets
        .losing
        .iter()
        .map(|p| p.symbol.as_str())
        .collect();
    assert_eq!(losing, vec!["E", "C"]);

    let top_profitable: Vec<&str> = result
        .stats
        .top_profitable
        .iter()
        .map(|p| p.symbol.as_str())
        .collect();
    assert_eq!(top_profitable, vec!["A", "D", "B"]);

    let top_losing: Vec<&str> = result
        .stats
        .top_losing
        .iter()
        .map(|p| p.symbol.as_str())
        .collect();
    assert_eq!(top_losing, vec!["E", "C"]);

    assert_eq!(result.stats.total_profit, 750.0);
    assert_eq!(result.stats.total_loss, -310.0);
    assert_eq!(result.stats.total_pnl, 440.0);
    assert_eq!(result.stats.total_trades, 5);
}

#[test]
fn test_same_input_gives_same_output() {
    let positions = vec![
        make_position("A", 120.0),
        make_position("B", 120.0),
        make_position("C", -5.0),
        make_position("D", 80.0),
    ];

    let first = categorize(&positions, 100.0);
    let second = categorize(&positions, 100.0);

    let order = |r: &vigil::services::Categorized| {
        r.buckets
            .high_profitable
            .iter()
            .chain(r.buckets.profitable.iter())
            .chain(r.buckets.losing.iter())
            .map(|p| p.symbol.clone())
            .collect::<Vec<_>>()
    };
    assert_eq!(order(&first), order(&second));
}

#[test]
fn test_threshold_knob_moves_bucket_split() {
    let positions = vec![make_position("A", 150.0), make_position("B", 80.0)];

    let low = categorize(&positions, 50.0);
    assert_eq!(low.buckets.high_profitable.len(), 2);
    assert_eq!(low.buckets.profitable.len(), 0);

    let high = categorize(&positions, 500.0);
    assert_eq!(high.buckets.high_profitable.len(), 0);
    assert_eq!(high.buckets.profitable.len(), 2);

    // Counts move with the split but the combined count does not.
    assert_eq!(low.stats.combined_profitable_count(), 2);
    assert_eq!(high.stats.combined_profitable_count(), 2);
}

#[test]
fn test_zero_pnl_counted_but_not_bucketed() {
    let positions = vec![make_position("A", 0.0), make_position("B", 10.0)];

    let result = categorize(&positions, 100.0);

    assert_eq!(result.stats.total_trades, 2);
    assert_eq!(result.buckets.profitable.len(), 1);
    assert!(result.buckets.losing.is_empty());
    assert_eq!(
        result.stats.combined_profitable_count() + result.stats.losing_count,
        1
    );
}
