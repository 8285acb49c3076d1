//! Coordinate validation.

/// Returns the latitude if it is a finite value within [-90, 90].
pub fn checked_latitude(value: f64) -> Option<f64> {
    (value.is_finite() && (-90.0..=90.0).contains(&value)).then_some(value)
}

/// Returns the longitude if it is a finite value within [-180, 180].
pub fn checked_longitude(value: f64) -> Option<f64> {
    (value.is_finite() && (-180.0..=180.0).contains(&value)).then_some(value)
}

/// Whether a latitude/longitude pair is usable for plotting.
///
/// Absence of either coordinate counts as invalid.
pub fn has_valid_coordinates(latitude: Option<f64>, longitude: Option<f64>) -> bool {
    matches!(
        (latitude.and_then(checked_latitude), longitude.and_then(checked_longitude)),
        (Some(_), Some(_))
    )
}

/// An entity with an optional geographic position.
pub trait Located {
    /// Latitude and longitude, in that order.
    fn coordinates(&self) -> (Option<f64>, Option<f64>);

    /// Whether both coordinates are present and in range.
    fn has_valid_coordinates(&self) -> bool {
        let (latitude, longitude) = self.coordinates();
        has_valid_coordinates(latitude, longitude)
    }
}

/// Keep only the items that can be placed on a map, in their original order.
pub fn with_valid_coordinates<T: Located>(items: &[T]) -> Vec<&T> {
    items.iter().filter(|item| item.has_valid_coordinates()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Point(Option<f64>, Option<f64>);

    impl Located for Point {
        fn coordinates(&self) -> (Option<f64>, Option<f64>) {
            (self.0, self.1)
        }
    }

    #[test]
    fn range_bounds_are_inclusive() {
        assert_eq!(checked_latitude(90.0), Some(90.0));
        assert_eq!(checked_latitude(-90.0), Some(-90.0));
        assert_eq!(checked_longitude(180.0), Some(180.0));
        assert_eq!(checked_longitude(-180.0), Some(-180.0));
    }

    #[test]
    fn out_of_range_is_rejected() {
        assert_eq!(checked_latitude(90.5), None);
        assert_eq!(checked_latitude(-120.0), None);
        assert_eq!(checked_longitude(180.01), None);
        assert_eq!(checked_latitude(f64::NAN), None);
        assert_eq!(checked_longitude(f64::INFINITY), None);
    }

    #[test]
    fn absence_is_invalid() {
        assert!(!has_valid_coordinates(None, Some(-83.74)));
        assert!(!has_valid_coordinates(Some(42.28), None));
        assert!(!has_valid_coordinates(None, None));
        assert!(has_valid_coordinates(Some(42.28), Some(-83.74)));
    }

    #[test]
    fn filter_keeps_order_and_drops_unlocated() {
        let points = vec![
            Point(Some(1.0), Some(2.0)),
            Point(None, None),
            Point(Some(3.0), Some(200.0)),
            Point(Some(-4.0), Some(5.0)),
        ];

        let kept = with_valid_coordinates(&points);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].0, Some(1.0));
        assert_eq!(kept[1].0, Some(-4.0));
    }
}
