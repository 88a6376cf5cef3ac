use crate::types::WorkoutKind;

/// Page-side collaborator: the entry form and the workout list.
pub trait Ui {
    /// Blocking user-facing message.
    fn alert(&mut self, message: &str);

    /// Reveal the entry form and focus the distance input.
    fn show_form(&mut self);

    /// Clear distance, duration, cadence and elevation, then hide the form.
    fn hide_form(&mut self);

    /// Make the cadence row (running) or the elevation row (cycling) visible.
    fn show_metric_field(&mut self, kind: WorkoutKind);

    /// Insert a rendered row directly after the form, so the newest row comes first.
    fn insert_row(&mut self, html: &str);
}
