// ==========================================
// FarePricingEngine 集成测试
// ==========================================
// 测试范围:
// 1. 票价矩阵: 双向键齐全、对称、键数 = n(n-1)
// 2. 票价随站距单调不减
// 3. 站序相同的车站按起步价计
// ==========================================

use metro_fare_revenue::domain::{PriceRule, Station};
use metro_fare_revenue::engine::FarePricingEngine;

fn line(n: i64) -> Vec<Station> {
    (0..n).map(|i| Station::new(format!("S{:02}", i), i * 2)).collect()
}

#[test]
fn test_matrix_is_complete_and_symmetric() {
    let engine = FarePricingEngine::new();
    let rule = PriceRule::new(3, 6000.0, 1000.0);
    let stations = line(12);

    let matrix = engine.generate_price_matrix(&stations, &rule);
    assert_eq!(matrix.len(), 12 * 11);

    for a in &stations {
        for b in &stations {
            if a.id == b.id {
                assert!(!matrix.contains_key(&format!("{}-{}", a.id, b.id)));
                continue;
            }
            let ab = matrix[&format!("{}-{}", a.id, b.id)];
            let ba = matrix[&format!("{}-{}", b.id, a.id)];
            assert_eq!(ab, ba);
            assert_eq!(ab, engine.calculate_price(a.distance_to(b), &rule));
        }
    }

    let compact = engine.generate_compact_matrix(&stations, &rule);
    assert_eq!(compact.to_directional_map(), matrix);
}

#[test]
fn test_price_monotonic_in_distance() {
    let engine = FarePricingEngine::new();
    let rule = PriceRule::new(2, 7000.0, 1500.0);

    let prices: Vec<f64> = (0..30).map(|d| engine.calculate_price(d, &rule)).collect();
    assert!(prices.windows(2).all(|w| w[0] <= w[1]));
    assert!(prices[3..].windows(2).all(|w| w[0] < w[1]));
    assert_eq!(prices[2], 7000.0);
    assert_eq!(prices[10], 7000.0 + 8.0 * 1500.0);
}

#[test]
fn test_same_order_index_is_base_price() {
    let engine = FarePricingEngine::new();
    let rule = PriceRule::default();
    let stations = vec![Station::new("X", 4), Station::new("Y", 4)];

    let matrix = engine.generate_price_matrix(&stations, &rule);
    assert_eq!(matrix["X-Y"], rule.base_price);
    assert_eq!(matrix.len(), 2);

    let quote = engine.quote("X", "Y", &stations, &rule).unwrap();
    assert!(quote.is_base_price);
    assert_eq!(quote.distance, 0);
}
