//! Line-oriented stand-in for the original two-tab dashboard: annual
//! prediction from twelve monthly figures, and per-month historical insights.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use tracing::warn;

use crate::charts::render_trend_chart;
use crate::data_handling::RainfallDataset;
use crate::error::Result;
use crate::insights::{stats, trend};
use crate::models::{InferenceRequest, Month};
use crate::prediction::PredictionService;

pub struct Dashboard<'a, R, W> {
    dataset: &'a RainfallDataset,
    service: &'a PredictionService,
    subdivisions: Vec<String>,
    default_month_value: f64,
    chart_dir: PathBuf,
    input: R,
    output: W,
}

impl<'a, R: BufRead, W: Write> Dashboard<'a, R, W> {
    pub fn new(
        dataset: &'a RainfallDataset,
        service: &'a PredictionService,
        default_month_value: f64,
        chart_dir: impl Into<PathBuf>,
        input: R,
        output: W,
    ) -> Self {
        Dashboard {
            dataset,
            service,
            subdivisions: dataset.subdivisions(),
            default_month_value,
            chart_dir: chart_dir.into(),
            input,
            output,
        }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Run until `q` or end of input.
    pub fn run(&mut self) -> Result<()> {
        writeln!(self.output, "Rainfall Prediction System")?;
        loop {
            writeln!(self.output)?;
            writeln!(self.output, "[1] Annual rainfall prediction")?;
            writeln!(self.output, "[2] Monthly rainfall insights")?;
            writeln!(self.output, "[q] Quit")?;
            let Some(choice) = self.prompt("> ")? else {
                return Ok(());
            };
            let outcome = match choice.as_str() {
                "1" => self.predict_tab(),
                "2" => self.insights_tab(),
                "q" | "Q" => return Ok(()),
                other => {
                    writeln!(self.output, "Unknown option '{other}'")?;
                    continue;
                }
            };
            match outcome {
                Ok(true) => {}
                Ok(false) => return Ok(()),
                Err(e) => writeln!(self.output, "Error: {e}")?,
            }
        }
    }

    /// `None` once the input is exhausted.
    fn prompt(&mut self, label: &str) -> Result<Option<String>> {
        write!(self.output, "{label}")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn select_subdivision(&mut self) -> Result<Option<String>> {
        writeln!(self.output, "Select Subdivision")?;
        for (i, name) in self.subdivisions.iter().enumerate() {
            writeln!(self.output, "  {:>2}. {}", i + 1, name)?;
        }
        loop {
            let Some(answer) = self.prompt("Subdivision number: ")? else {
                return Ok(None);
            };
            match answer.parse::<usize>() {
                Ok(n) if (1..=self.subdivisions.len()).contains(&n) => {
                    return Ok(Some(self.subdivisions[n - 1].clone()));
                }
                _ => writeln!(self.output, "Enter a number between 1 and {}", self.subdivisions.len())?,
            }
        }
    }

    fn select_month(&mut self) -> Result<Option<Month>> {
        loop {
            let Some(answer) = self.prompt("Select Month (JAN..DEC): ")? else {
                return Ok(None);
            };
            match answer.parse::<Month>() {
                Ok(month) => return Ok(Some(month)),
                Err(e) => writeln!(self.output, "{e}")?,
            }
        }
    }

    fn read_month_values(&mut self) -> Result<Option<[f64; 12]>> {
        writeln!(self.output, "Enter Monthly Rainfall (mm), blank keeps the default")?;
        let mut values = [self.default_month_value; 12];
        for month in Month::ALL {
            loop {
                let label = format!("  {month} [{:.1}]: ", self.default_month_value);
                let Some(answer) = self.prompt(&label)? else {
                    return Ok(None);
                };
                if answer.is_empty() {
                    break;
                }
                match answer.parse::<f64>() {
                    Ok(v) if v.is_finite() && v >= 0.0 => {
                        values[month.index()] = v;
                        break;
                    }
                    _ => writeln!(self.output, "  {month} must be a number >= 0.0")?,
                }
            }
        }
        Ok(Some(values))
    }

    /// `Ok(false)` means the input ran out mid-way.
    fn predict_tab(&mut self) -> Result<bool> {
        let Some(subdivision) = self.select_subdivision()? else {
            return Ok(false);
        };
        let Some(values) = self.read_month_values()? else {
            return Ok(false);
        };
        let prediction = self.service.predict(&InferenceRequest::new(subdivision, values))?;
        writeln!(self.output, "Predicted Annual Rainfall: {prediction:.2} mm")?;
        Ok(true)
    }

    fn insights_tab(&mut self) -> Result<bool> {
        let Some(subdivision) = self.select_subdivision()? else {
            return Ok(false);
        };
        let Some(month) = self.select_month()? else {
            return Ok(false);
        };

        let s = stats(self.dataset, &subdivision, month)?;
        writeln!(self.output, "Average Rainfall (mm): {:.2}", s.mean)?;
        writeln!(self.output, "Minimum Recorded (mm): {:.2}", s.min)?;
        writeln!(self.output, "Maximum Recorded (mm): {:.2}", s.max)?;

        let t = trend(self.dataset, &subdivision)?;
        writeln!(self.output, "Monthly Rainfall Trend")?;
        for m in Month::ALL {
            writeln!(self.output, "  {m}: {:.2}", t[m.index()])?;
        }

        let file_name = format!("trend_{}.svg", subdivision.replace(|c: char| !c.is_ascii_alphanumeric(), "_"));
        let chart_path = self.chart_dir.join(file_name);
        match render_trend_chart(&chart_path, &subdivision, &t) {
            Ok(()) => writeln!(self.output, "Trend chart: {}", chart_path.display())?,
            Err(e) => warn!("Could not render trend chart: {}", e),
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::{AlignmentMode, FeatureEncoder};
    use crate::model::{train, TrainOptions};
    use crate::models::HistoricalRecord;
    use rand::{rngs::StdRng, Rng, SeedableRng};
    use std::io::Cursor;

    fn dataset() -> RainfallDataset {
        let mut rng = StdRng::seed_from_u64(11);
        let records = (0..40)
            .map(|i| {
                let sub = if i % 2 == 0 { "ALPHA" } else { "BETA" };
                let mut month_values = [0.0; 12];
                for v in month_values.iter_mut() {
                    *v = rng.gen_range(0.0..300.0);
                }
                let bonus = if sub == "BETA" { 100.0 } else { 0.0 };
                HistoricalRecord {
                    subdivision: sub.to_string(),
                    annual_total: month_values.iter().sum::<f64>() + bonus,
                    month_values,
                }
            })
            .collect();
        RainfallDataset::new(records)
    }

    fn run_session(script: &str) -> String {
        let ds = dataset();
        let report = train(&ds, &FeatureEncoder::default(), TrainOptions::default()).unwrap();
        let service = PredictionService::from_report(&report, AlignmentMode::Lenient).unwrap();
        let dir = tempfile::tempdir().unwrap();

        let mut dashboard = Dashboard::new(
            &ds,
            &service,
            50.0,
            dir.path(),
            Cursor::new(script.to_string()),
            Vec::new(),
        );
        dashboard.run().unwrap();
        String::from_utf8(dashboard.into_output()).unwrap()
    }

    #[test]
    fn prediction_with_defaults() {
        // BETA, all twelve months left at 50.0
        let script = format!("1\n2\n{}q\n", "\n".repeat(12));
        let out = run_session(&script);
        let line = out
            .lines()
            .find(|l| l.contains("Predicted Annual Rainfall"))
            .expect("no prediction printed");
        // The last month prompt shares the line
        let value: f64 = line
            .split("Predicted Annual Rainfall: ")
            .nth(1)
            .and_then(|rest| rest.strip_suffix(" mm"))
            .and_then(|v| v.parse().ok())
            .expect("unparseable prediction");
        assert!((value - 700.0).abs() < 1e-3, "{line}");
    }

    #[test]
    fn invalid_entries_are_reprompted() {
        let script = format!("1\n9\n1\n-5\nabc\n10\n{}q\n", "\n".repeat(11));
        let out = run_session(&script);
        assert!(out.contains("Enter a number between 1 and 2"));
        assert!(out.contains("JAN must be a number >= 0.0"));
        assert!(out.contains("Predicted Annual Rainfall"));
    }

    #[test]
    fn insights_print_stats_and_trend() {
        let out = run_session("2\n1\njul\nq\n");
        assert!(out.contains("Average Rainfall (mm):"));
        assert!(out.contains("Minimum Recorded (mm):"));
        assert!(out.contains("Maximum Recorded (mm):"));
        assert!(out.contains("  DEC: "));
    }

    #[test]
    fn end_of_input_stops_cleanly() {
        let out = run_session("1\n1\n10\n");
        assert!(!out.contains("Predicted"));
    }
}
