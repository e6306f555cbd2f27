//! Macros for declaring states with less boilerplate.

/// Create several plain states at once.
///
/// Evaluates to `Result<[State; N], DefinitionError>`, failing on the first
/// blank name.
///
/// # Example
///
/// ```
/// use krypton::states;
///
/// let [armed, disarmed, alarm] = states!["Armed", "Disarmed", "Alarm"].unwrap();
/// assert_eq!(armed.name(), "Armed");
/// assert_eq!(disarmed.name(), "Disarmed");
/// assert_eq!(alarm.name(), "Alarm");
/// ```
#[macro_export]
macro_rules! states {
    ($($name:expr),+ $(,)?) => {
        (|| -> ::std::result::Result<_, $crate::core::DefinitionError> {
            ::std::result::Result::Ok([$($crate::core::State::new($name)?),+])
        })()
    };
}
