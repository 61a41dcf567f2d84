use log::info;

use crate::data::model::FeatureTable;
use crate::error::{EvalError, EvalResult};
use crate::model::Regressor;

/// Run `model` over every row of `features`, in row order.
///
/// Model features are bound to table columns by name once; a feature the
/// table lacks fails the whole call and no predictions are returned.
pub fn predict(model: &dyn Regressor, features: &FeatureTable) -> EvalResult<Vec<f64>> {
    let names = model.feature_names();
    let mut binding = Vec::with_capacity(names.len());
    let mut missing = Vec::new();
    for name in names {
        match features.column_index(name) {
            Some(idx) => binding.push(idx),
            None => missing.push(name.as_str()),
        }
    }
    if !missing.is_empty() {
        return Err(EvalError::Inference(format!(
            "feature table lacks model column(s): {}",
            missing.join(", ")
        )));
    }

    let mut input = vec![0.0; binding.len()];
    let predictions: Vec<f64> = features
        .rows()
        .iter()
        .map(|row| {
            for (slot, &col) in input.iter_mut().zip(&binding) {
                *slot = row[col];
            }
            model.predict_row(&input)
        })
        .collect();

    info!("generated {} predictions", predictions.len());
    Ok(predictions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Table;
    use crate::model::LinearModel;

    fn model() -> LinearModel {
        LinearModel {
            feature_names: vec!["rainfall_mm".into(), "soil_pH".into()],
            intercept: 0.0,
            coefficients: vec![1.0, 100.0],
        }
    }

    #[test]
    fn binds_columns_by_name_and_keeps_row_order() {
        // Table column order differs from the model's; extra column ignored.
        let features = FeatureTable::new(Table::new(
            vec!["soil_pH".into(), "plot".into(), "rainfall_mm".into()],
            vec![
                vec![6.0, 1.0, 10.0],
                vec![7.0, 2.0, 20.0],
                vec![5.0, 3.0, 30.0],
            ],
        ));
        let out = predict(&model(), &features).unwrap();
        assert_eq!(out, vec![610.0, 720.0, 530.0]);
    }

    #[test]
    fn missing_model_column_is_an_inference_error() {
        let features = FeatureTable::new(Table::new(
            vec!["soil_pH".into()],
            vec![vec![6.0]],
        ));
        let err = predict(&model(), &features).unwrap_err();
        match err {
            EvalError::Inference(msg) => assert!(msg.contains("rainfall_mm"), "{msg}"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn does_not_mutate_features() {
        let features = FeatureTable::new(Table::new(
            vec!["rainfall_mm".into(), "soil_pH".into()],
            vec![vec![1.0, 2.0]],
        ));
        let before = features.clone();
        predict(&model(), &features).unwrap();
        assert_eq!(features, before);
    }
}
