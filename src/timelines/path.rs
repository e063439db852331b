use crate::errors::Error;
use crate::timelines::point::EPSILON;
use crate::timelines::PathPoint;

/// An ordered keyframe sequence for one animated channel.
///
/// The points are kept sorted ascending by [`Transition::time`](crate::timelines::Transition).
/// Equal-time points are permitted; ties keep their original insertion order (a new point
/// lands after the existing ones with the same time). Indices are only valid until the
/// next mutation.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Default, Clone, Debug)]
pub struct KeyframePath<P: PathPoint> {
    points: Vec<P>,
}

impl<P: PathPoint> KeyframePath<P> {
    /// Creates an empty path.
    pub fn new() -> Self {
        Self { points: vec![] }
    }

    /// Inserts a point preserving the sort order and returns its index.
    ///
    /// Negative times are clamped to 0 before insertion.
    pub fn add_point(&mut self, mut point: P) -> usize {
        let time = point.time().max(0.0);
        point.transition_mut().time = time;

        // Upper-bound search: a new point goes after existing points with an equal time.
        let index = self.points.partition_point(|existing| existing.time() <= time);
        self.points.insert(index, point);
        index
    }

    /// Returns the point at `index`, or [`Error::IndexOutOfRange`].
    pub fn get_point(&self, index: usize) -> Result<&P, Error> {
        self.points.get(index).ok_or(Error::IndexOutOfRange {
            index,
            count: self.points.len(),
        })
    }

    /// Replaces the point at `index`.
    ///
    /// If the new time matches the old one (within epsilon) the point is replaced in
    /// place and the index is unchanged. Otherwise the old point is removed and the new
    /// one re-inserted at its sorted position: the returned index may differ from `index`.
    pub fn edit_point(&mut self, index: usize, point: P) -> Result<usize, Error> {
        let current_time = self.get_point(index)?.time();
        if (point.time() - current_time).abs() < EPSILON {
            self.points[index] = point;
            Ok(index)
        } else {
            self.points.remove(index);
            Ok(self.add_point(point))
        }
    }

    /// Removes the point at `index`. Out-of-range indices are silently ignored.
    pub fn remove_point(&mut self, index: usize) {
        if index < self.points.len() {
            self.points.remove(index);
        }
    }

    /// Empties the path.
    pub fn clear(&mut self) {
        self.points.clear();
    }

    /// Returns the number of points in the path.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Indicates if the path holds no point.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Returns the sorted points as a slice.
    pub fn points(&self) -> &[P] {
        &self.points
    }

    /// Mutable iteration, used to refresh live-captured point values before playback.
    pub(crate) fn points_mut(&mut self) -> impl Iterator<Item = &mut P> {
        self.points.iter_mut()
    }

    /// Returns the time of the last keyframe (0 for an empty path).
    pub fn last_time(&self) -> f32 {
        self.points.last().map_or(0.0, |point| point.time())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timelines::{Transition, TranslationPoint, Vector3};

    fn point_at(time: f32) -> TranslationPoint {
        TranslationPoint::new(Vector3::new(time, 0.0, 0.0), Transition::new(time))
    }

    fn assert_sorted(path: &KeyframePath<TranslationPoint>) {
        let times: Vec<f32> = path.points().iter().map(|p| p.time()).collect();
        for pair in times.windows(2) {
            assert!(pair[0] <= pair[1], "unsorted times: {:?}", times);
        }
    }

    #[test]
    fn test_add_point_keeps_sort_order() {
        let mut path = KeyframePath::new();
        for time in [5.0, 1.0, 3.0, 2.0, 4.0, 0.5, 3.5] {
            path.add_point(point_at(time));
            assert_sorted(&path);
        }
        assert_eq!(path.len(), 7);
        assert_eq!(path.get_point(0).unwrap().time(), 0.5);
        assert_eq!(path.get_point(6).unwrap().time(), 5.0);
    }

    #[test]
    fn test_add_point_returns_index() {
        let mut path = KeyframePath::new();
        assert_eq!(path.add_point(point_at(2.0)), 0);
        assert_eq!(path.add_point(point_at(1.0)), 0);
        assert_eq!(path.add_point(point_at(3.0)), 2);
        assert_eq!(path.add_point(point_at(1.5)), 1);
    }

    #[test]
    fn test_add_point_clamps_negative_time() {
        let mut path = KeyframePath::new();
        let index = path.add_point(point_at(-4.2));
        assert_eq!(path.get_point(index).unwrap().time(), 0.0);
    }

    #[test]
    fn test_equal_times_keep_insertion_order() {
        let mut path = KeyframePath::new();
        path.add_point(TranslationPoint::new(
            Vector3::new(1.0, 0.0, 0.0),
            Transition::new(2.0),
        ));
        let second = path.add_point(TranslationPoint::new(
            Vector3::new(2.0, 0.0, 0.0),
            Transition::new(2.0),
        ));
        // The later insertion lands after the existing equal-time point.
        assert_eq!(second, 1);
        assert_eq!(path.get_point(0).unwrap().value.x, 1.0);
        assert_eq!(path.get_point(1).unwrap().value.x, 2.0);
    }

    #[test]
    fn test_get_point_out_of_range() {
        let mut path = KeyframePath::new();
        path.add_point(point_at(1.0));
        let error = path.get_point(1).unwrap_err();
        assert_eq!(
            format!("{}", error),
            "Point index 1 out of range (count: 1)."
        );
    }

    #[test]
    fn test_edit_point_same_time_keeps_index() {
        let mut path = KeyframePath::new();
        path.add_point(point_at(1.0));
        path.add_point(point_at(2.0));
        path.add_point(point_at(3.0));

        // Same time (within epsilon): in-place replacement, index unchanged.
        let replacement =
            TranslationPoint::new(Vector3::new(9.0, 9.0, 9.0), Transition::new(2.00005));
        let index = path.edit_point(1, replacement).unwrap();
        assert_eq!(index, 1);
        assert_eq!(path.get_point(1).unwrap().value.x, 9.0);
        assert_eq!(path.len(), 3);
    }

    #[test]
    fn test_edit_point_new_time_resorts() {
        let mut path = KeyframePath::new();
        path.add_point(point_at(1.0));
        path.add_point(point_at(2.0));
        path.add_point(point_at(3.0));

        // Move the middle point past the end: it must re-sort.
        let index = path.edit_point(1, point_at(5.0)).unwrap();
        assert_eq!(index, 2);
        assert_sorted(&path);
        assert_eq!(path.len(), 3);
        assert_eq!(path.last_time(), 5.0);

        let error = path.edit_point(12, point_at(0.0)).unwrap_err();
        assert!(matches!(error, Error::IndexOutOfRange { index: 12, .. }));
    }

    #[test]
    fn test_remove_point() {
        let mut path = KeyframePath::new();
        path.add_point(point_at(1.0));
        path.add_point(point_at(2.0));

        path.remove_point(0);
        assert_eq!(path.len(), 1);
        assert_eq!(path.get_point(0).unwrap().time(), 2.0);

        // Out of range is a no-op, not a failure.
        path.remove_point(10);
        assert_eq!(path.len(), 1);
    }

    #[test]
    fn test_clear_and_last_time() {
        let mut path = KeyframePath::new();
        assert_eq!(path.last_time(), 0.0);
        assert!(path.is_empty());

        path.add_point(point_at(1.0));
        path.add_point(point_at(7.5));
        assert_eq!(path.last_time(), 7.5);

        path.clear();
        assert!(path.is_empty());
        assert_eq!(path.last_time(), 0.0);
    }
}
