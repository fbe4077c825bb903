//! Workload definitions
//!
//! A workload is a named unit of work with an optional one-time setup, a
//! repeatable measured action and an optional teardown. The harness only sees
//! the object-safe [`Workload`] trait; [`FixtureWorkload`] builds one from
//! closures, owning whatever fixture `setup` produced for the duration of
//! the run.

use std::hint::black_box;

/// Group label used when a workload does not declare one.
pub const DEFAULT_GROUP: &str = "default";

/// A named, repeatable unit of measured work.
pub trait Workload {
    /// Unique name, used as the report row label.
    fn name(&self) -> &str;

    /// Group label for report sections and filtering.
    fn group(&self) -> &str {
        DEFAULT_GROUP
    }

    /// Units of work performed by one `action()` call, if meaningful.
    /// Used to derive throughput.
    fn units_per_action(&self) -> Option<u64> {
        None
    }

    /// Runs once before any warmup or measured iteration.
    fn setup(&mut self) -> anyhow::Result<()> {
        Ok(())
    }

    /// The measured unit. Must tolerate being called any number of times.
    fn action(&mut self) -> anyhow::Result<()>;

    /// Runs once after the last iteration, only if `setup` succeeded.
    fn teardown(&mut self) {}
}

type SetupFn<F> = Box<dyn FnMut() -> anyhow::Result<F>>;
type ActionFn<F> = Box<dyn FnMut(&mut F) -> anyhow::Result<()>>;
type TeardownFn<F> = Box<dyn FnMut(F)>;

/// Closure-backed workload carrying a fixture of type `F`.
///
/// ```ignore
/// let w = FixtureWorkload::with_setup(
///     "sha256",
///     || Ok(vec![0u8; 10_000]),
///     |data: &mut Vec<u8>| Ok(Sha256::digest(data)),
/// )
/// .in_group("hashing");
/// ```
pub struct FixtureWorkload<F> {
    name: String,
    group: String,
    units: Option<u64>,
    setup: SetupFn<F>,
    action: ActionFn<F>,
    teardown: Option<TeardownFn<F>>,
    fixture: Option<F>,
}

impl FixtureWorkload<()> {
    /// Workload without setup whose action cannot fail.
    pub fn simple<T, A>(name: impl Into<String>, mut action: A) -> Self
    where
        A: FnMut() -> T + 'static,
    {
        Self::with_setup(name, || Ok(()), move |_: &mut ()| Ok(action()))
    }

    /// Workload without setup whose action may fail.
    pub fn fallible<T, A>(name: impl Into<String>, mut action: A) -> Self
    where
        A: FnMut() -> anyhow::Result<T> + 'static,
    {
        Self::with_setup(name, || Ok(()), move |_: &mut ()| action())
    }
}

impl<F: 'static> FixtureWorkload<F> {
    /// Workload whose action borrows a fixture built once by `setup`.
    ///
    /// The action's output goes through `black_box` so the optimizer cannot
    /// discard the computation.
    pub fn with_setup<T, S, A>(name: impl Into<String>, setup: S, mut action: A) -> Self
    where
        S: FnMut() -> anyhow::Result<F> + 'static,
        A: FnMut(&mut F) -> anyhow::Result<T> + 'static,
    {
        Self {
            name: name.into(),
            group: DEFAULT_GROUP.to_string(),
            units: None,
            setup: Box::new(setup),
            action: Box::new(move |fixture| {
                let output = action(fixture)?;
                black_box(output);
                Ok(())
            }),
            teardown: None,
            fixture: None,
        }
    }

    /// Set the group label.
    pub fn in_group(mut self, group: impl Into<String>) -> Self {
        self.group = group.into();
        self
    }

    /// Declare the units of work performed per action.
    pub fn with_units(mut self, units: u64) -> Self {
        self.units = Some(units);
        self
    }

    /// Consume the fixture after the run. Without a teardown the fixture is
    /// simply dropped.
    pub fn on_teardown<D>(mut self, teardown: D) -> Self
    where
        D: FnMut(F) + 'static,
    {
        self.teardown = Some(Box::new(teardown));
        self
    }
}

impl<F> Workload for FixtureWorkload<F> {
    fn name(&self) -> &str {
        &self.name
    }

    fn group(&self) -> &str {
        &self.group
    }

    fn units_per_action(&self) -> Option<u64> {
        self.units
    }

    fn setup(&mut self) -> anyhow::Result<()> {
        self.fixture = Some((self.setup)()?);
        Ok(())
    }

    fn action(&mut self) -> anyhow::Result<()> {
        let fixture = self
            .fixture
            .as_mut()
            .ok_or_else(|| anyhow::anyhow!("workload `{}` has no fixture; setup has not run", self.name))?;
        (self.action)(fixture)
    }

    fn teardown(&mut self) {
        if let Some(fixture) = self.fixture.take() {
            match self.teardown.as_mut() {
                Some(teardown) => teardown(fixture),
                None => drop(fixture),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_simple_workload_runs_without_explicit_setup() {
        let mut w = FixtureWorkload::simple("add", || 2 + 2);
        assert_eq!(w.name(), "add");
        assert_eq!(w.group(), DEFAULT_GROUP);
        w.setup().unwrap();
        assert!(w.action().is_ok());
    }

    #[test]
    fn test_action_before_setup_fails() {
        let mut w = FixtureWorkload::simple("early", || 1);
        let err = w.action().unwrap_err();
        assert!(err.to_string().contains("setup has not run"));
    }

    #[test]
    fn test_fixture_is_built_once_and_torn_down() {
        let setups = Rc::new(Cell::new(0));
        let torn_down = Rc::new(Cell::new(false));
        let s = setups.clone();
        let t = torn_down.clone();

        let mut w = FixtureWorkload::with_setup(
            "sum",
            move || {
                s.set(s.get() + 1);
                Ok(vec![1u64, 2, 3])
            },
            |v: &mut Vec<u64>| Ok(v.iter().sum::<u64>()),
        )
        .in_group("collections")
        .with_units(3)
        .on_teardown(move |v| {
            assert_eq!(v.len(), 3);
            t.set(true);
        });

        w.setup().unwrap();
        for _ in 0..5 {
            w.action().unwrap();
        }
        w.teardown();

        assert_eq!(setups.get(), 1);
        assert!(torn_down.get());
        assert_eq!(w.group(), "collections");
        assert_eq!(w.units_per_action(), Some(3));
        // Fixture is gone after teardown
        assert!(w.action().is_err());
    }

    #[test]
    fn test_fallible_action_propagates_error() {
        let mut w = FixtureWorkload::fallible("boom", || -> anyhow::Result<u32> {
            anyhow::bail!("nope")
        });
        w.setup().unwrap();
        assert_eq!(w.action().unwrap_err().to_string(), "nope");
    }
}
