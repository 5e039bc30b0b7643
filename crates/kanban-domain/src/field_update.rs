/// Three-state update for an optional field.
///
/// Used by partial updates where "leave alone" and "clear" must be told apart.
///
/// ```
/// use kanban_domain::FieldUpdate;
///
/// let mut due = Some(3);
/// FieldUpdate::<i32>::NoChange.apply_to(&mut due);
/// assert_eq!(due, Some(3));
///
/// FieldUpdate::Clear.apply_to(&mut due);
/// assert_eq!(due, None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FieldUpdate<T> {
    #[default]
    NoChange,
    Set(T),
    Clear,
}

impl<T> FieldUpdate<T> {
    pub fn apply_to(self, field: &mut Option<T>) {
        match self {
            FieldUpdate::NoChange => {}
            FieldUpdate::Set(value) => *field = Some(value),
            FieldUpdate::Clear => *field = None,
        }
    }

    pub fn is_change(&self) -> bool {
        !matches!(self, FieldUpdate::NoChange)
    }

    /// Build an update from an optional new value and an explicit clear flag.
    /// The clear flag wins when both are given.
    pub fn from_parts(value: Option<T>, clear: bool) -> Self {
        match (value, clear) {
            (_, true) => FieldUpdate::Clear,
            (Some(value), false) => FieldUpdate::Set(value),
            (None, false) => FieldUpdate::NoChange,
        }
    }
}
