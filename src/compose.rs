//! Right-to-left function composition.

/// A boxed single-argument function from `T` to `T`.
pub type Unary<T> = Box<dyn Fn(T) -> T>;

/// Compose `funcs` right to left: `compose(vec![f, g, h])(x) == f(g(h(x)))`.
///
/// No functions yields the identity; a single function is returned as is.
///
/// # Example
///
/// ```rust
/// use statecraft::compose::{compose, Unary};
///
/// let double: Unary<i32> = Box::new(|x| x * 2);
/// let inc: Unary<i32> = Box::new(|x| x + 1);
///
/// assert_eq!(compose(vec![double, inc])(3), 8);
/// assert_eq!(compose::<i32>(vec![])(3), 3);
/// ```
pub fn compose<T: 'static>(funcs: Vec<Unary<T>>) -> Unary<T> {
    let mut funcs = funcs;
    match funcs.len() {
        0 => Box::new(|x| x),
        1 => funcs.remove(0),
        _ => Box::new(move |x| funcs.iter().rev().fold(x, |acc, f| f(acc))),
    }
}

/// Compose closures of differing types right to left.
///
/// `compose!(f, g, h)` is `move |x| f(g(h(x)))`; `compose!()` is the identity.
///
/// # Example
///
/// ```
/// use statecraft::compose;
///
/// let describe = compose!(|n: usize| format!("{n} chars"), |s: &str| s.len());
/// assert_eq!(describe("hello"), "5 chars");
/// ```
#[macro_export]
macro_rules! compose {
    () => {
        |x| x
    };
    ($f:expr $(,)?) => {
        $f
    };
    ($f:expr, $($rest:expr),+ $(,)?) => {{
        let outer = $f;
        let inner = $crate::compose!($($rest),+);
        move |x| outer(inner(x))
    }};
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[test]
    fn empty_composition_is_identity() {
        let id = compose::<String>(Vec::new());
        assert_eq!(id("same".to_string()), "same");
    }

    #[test]
    fn single_function_is_returned_unchanged() {
        let f: Unary<i32> = Box::new(|x| x * 10);
        let before: *const dyn Fn(i32) -> i32 = &*f;
        let composed = compose(vec![f]);
        let after: *const dyn Fn(i32) -> i32 = &*composed;

        assert!(std::ptr::addr_eq(before, after));
        assert_eq!(composed(2), 20);
    }

    #[test]
    fn rightmost_function_runs_first() {
        let order = Rc::new(std::cell::RefCell::new(Vec::new()));
        let step = |name: &'static str| -> Unary<u8> {
            let order = Rc::clone(&order);
            Box::new(move |x| {
                order.borrow_mut().push(name);
                x
            })
        };

        compose(vec![step("f"), step("g"), step("h")])(0);
        assert_eq!(*order.borrow(), vec!["h", "g", "f"]);
    }

    #[test]
    fn macro_composes_mixed_types() {
        let parse_then_double = compose!(|n: i64| n * 2, |s: &str| s.parse::<i64>().unwrap_or(0));
        assert_eq!(parse_then_double("21"), 42);

        let single = compose!(|x: u8| x + 1);
        assert_eq!(single(1), 2);

        let identity = compose!();
        assert_eq!(identity(5), 5);
    }
}
