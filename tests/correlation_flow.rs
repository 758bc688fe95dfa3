mod common;

use common::{Fixture, Measurement, USER, d};
use gymgraph::domain::errors::AnalyticsError;

#[tokio::test]
async fn test_perfect_positive_correlation() {
    let fx = Fixture::new().await;
    for (date, liters, steps) in [
        ("2024-06-01", 1.0, 1000),
        ("2024-06-02", 2.0, 2000),
        ("2024-06-03", 3.0, 3000),
    ] {
        fx.log_water(USER, date, liters).await;
        fx.log_steps(USER, date, steps).await;
    }
    // Only one side recorded: not aligned
    fx.log_water(USER, "2024-06-04", 9.0).await;

    let result = fx
        .service
        .get_correlation("water", "steps", d("2024-06-01"), d("2024-06-30"))
        .await
        .unwrap();

    assert_eq!(result.coefficient, Some(1.0));
    assert_eq!(result.sample_count, 3);
    let interpretation = result.interpretation.unwrap();
    assert_eq!(interpretation.strength, "very strong");
    assert_eq!(interpretation.direction, "positive");

    let dates: Vec<_> = result.scatter_points.iter().map(|p| p.date).collect();
    assert_eq!(
        dates,
        vec![d("2024-06-01"), d("2024-06-02"), d("2024-06-03")]
    );
    assert_eq!(result.scatter_points[2].x, 3.0);
    assert_eq!(result.scatter_points[2].y, 3000.0);
}

#[tokio::test]
async fn test_negative_correlation_across_domains() {
    let fx = Fixture::new().await;
    let food = fx.add_food("Rice", 100.0, 2.0).await;
    for (date, portions, weight) in [
        ("2024-06-01", 10.0, 80.0),
        ("2024-06-02", 20.0, 79.0),
        ("2024-06-03", 30.0, 78.5),
        ("2024-06-04", 25.0, 78.0),
    ] {
        fx.log_food(USER, food, date, portions).await;
        fx.log_measurement(
            USER,
            date,
            Measurement {
                weight_kg: Some(weight),
                ..Default::default()
            },
        )
        .await;
    }

    let result = fx
        .service
        .get_correlation("calories", "weight", d("2024-06-01"), d("2024-06-30"))
        .await
        .unwrap();

    let r = result.coefficient.unwrap();
    assert!(r < 0.0 && r >= -1.0);
    assert_eq!(result.interpretation.unwrap().direction, "negative");
    assert_eq!(result.sample_count, 4);
}

#[tokio::test]
async fn test_constant_series_correlates_to_zero() {
    let fx = Fixture::new().await;
    for (date, hours, steps) in [
        ("2024-06-01", 5.0, 1000),
        ("2024-06-02", 5.0, 9000),
        ("2024-06-03", 5.0, 2000),
    ] {
        fx.log_sleep(USER, date, hours, None).await;
        fx.log_steps(USER, date, steps).await;
    }

    let result = fx
        .service
        .get_correlation("sleep_hours", "steps", d("2024-06-01"), d("2024-06-03"))
        .await
        .unwrap();

    assert_eq!(result.coefficient, Some(0.0));
    let interpretation = result.interpretation.unwrap();
    assert_eq!(interpretation.direction, "");
    assert_eq!(interpretation.explanation, "no apparent linear relationship");
}

#[tokio::test]
async fn test_two_common_points_is_insufficient() {
    let fx = Fixture::new().await;
    fx.log_water(USER, "2024-06-01", 1.0).await;
    fx.log_water(USER, "2024-06-02", 2.0).await;
    fx.log_water(USER, "2024-06-03", 3.0).await;
    fx.log_steps(USER, "2024-06-01", 100).await;
    fx.log_steps(USER, "2024-06-02", 200).await;
    fx.log_steps(USER, "2024-06-05", 300).await;

    let result = fx
        .service
        .get_correlation("water", "steps", d("2024-06-01"), d("2024-06-30"))
        .await
        .unwrap();

    assert_eq!(result.coefficient, None);
    assert_eq!(result.sample_count, 2);
    assert!(result.interpretation.is_none());
    assert!(result.message.unwrap().contains("minimum 3"));
    assert_eq!(fx.metrics.correlation_count("insufficient"), 1);
}

#[tokio::test]
async fn test_batch_with_unknown_metric_keeps_calories() {
    let fx = Fixture::new().await;
    let food = fx.add_food("Oats", 100.0, 4.0).await;
    fx.log_food(USER, food, "2024-06-01", 2.0).await;

    let ids = vec!["calories".to_string(), "not_a_real_metric".to_string()];
    let batch = fx
        .service
        .get_metric_data(&ids, d("2024-06-01"), d("2024-06-30"))
        .await
        .unwrap();

    let calories = batch.series("calories").unwrap();
    assert_eq!(calories.value_on(d("2024-06-01")), Some(200.0));
    assert!(matches!(
        batch.get("not_a_real_metric"),
        Some(Err(AnalyticsError::UnknownMetric { .. }))
    ));

    let err = fx
        .service
        .get_correlation("calories", "not_a_real_metric", d("2024-06-01"), d("2024-06-30"))
        .await
        .unwrap_err();
    assert!(matches!(err, AnalyticsError::UnknownMetric { .. }));
}
