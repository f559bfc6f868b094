/// A value read from an input that may come with warnings.
///
/// Unlike a `Result`, there is always a value; the warnings are reported to the caller through a callback.
pub(crate) enum WarningResult<T> {
    Ok(T),
    Warned(T, Vec<String>),
}

impl<T> WarningResult<T> {
    /// Returns the value, passing the warnings (if any) to the provided callback.
    pub(crate) fn consume_warnings<F>(self, f: F) -> T
    where
        F: FnOnce(Vec<String>),
    {
        match self {
            WarningResult::Ok(t) => t,
            WarningResult::Warned(t, w) => {
                f(w);
                t
            }
        }
    }

    /// Maps the value, keeping the warnings.
    pub(crate) fn map<U, F>(self, f: F) -> WarningResult<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            WarningResult::Ok(t) => WarningResult::Ok(f(t)),
            WarningResult::Warned(t, w) => WarningResult::Warned(f(t), w),
        }
    }

    /// Merges two values into a couple, concatenating their warnings.
    pub(crate) fn zip<U>(self, other: WarningResult<U>) -> WarningResult<(T, U)> {
        let (t, mut w1) = self.into_parts();
        let (u, w2) = other.into_parts();
        w1.extend(w2);
        if w1.is_empty() {
            WarningResult::Ok((t, u))
        } else {
            WarningResult::Warned((t, u), w1)
        }
    }

    fn into_parts(self) -> (T, Vec<String>) {
        match self {
            WarningResult::Ok(t) => (t, vec![]),
            WarningResult::Warned(t, w) => (t, w),
        }
    }
}
