//! Built-in page registry for the dashboard application.

use uihealth_protocols::{Expectation, PageTarget};

/// Registry used when the configuration lists no `[[pages]]`.
pub fn default_registry() -> Vec<PageTarget> {
    vec![
        PageTarget::new("/")
            .with_name("Root (redirect to Dashboard)")
            .expect(Expectation::text_contains("h3", "Dashboard")),
        PageTarget::new("/dashboard")
            .with_name("Dashboard")
            .expect(Expectation::exists("#dash-top-final")),
        PageTarget::new("/signals")
            .with_name("Signals")
            .expect(Expectation::exists("#signals-table")),
        PageTarget::new("/portfolio")
            .with_name("Portfolio")
            .expect(Expectation::exists("#port-proposal")),
        PageTarget::new("/forecasts")
            .with_name("Forecasts")
            .expect(Expectation::exists("#forecasts-content")),
        PageTarget::new("/deep_dive")
            .with_name("Deep Dive")
            .expect(Expectation::exists("#deep-dive-ticker")),
        PageTarget::new("/backtests")
            .with_name("Backtests")
            .expect(Expectation::any_of([
                "#backtests-topn-curve",
                "#backtests-charts",
                "table",
                ".dbc",
            ])),
        PageTarget::new("/evaluation")
            .with_name("Evaluation")
            .expect(Expectation::exists("#evaluation-table")),
        PageTarget::new("/agents")
            .with_name("Agents Status")
            .expect(Expectation::text_contains("h3", "Agents Status")),
        PageTarget::new("/quality")
            .with_name("Quality")
            .expect(Expectation::text_contains("h3", "Qualité des données")),
        PageTarget::new("/observability")
            .with_name("Observability")
            .expect(Expectation::exists("#dash-http-status")),
        PageTarget::new("/regimes")
            .with_name("Regimes")
            .expect(Expectation::text_contains("h3", "Regimes")),
        PageTarget::new("/risk")
            .with_name("Risk")
            .expect(Expectation::text_contains("h3", "Risk")),
        PageTarget::new("/recession")
            .with_name("Recession")
            .expect(Expectation::text_contains("h3", "Recession")),
    ]
}
