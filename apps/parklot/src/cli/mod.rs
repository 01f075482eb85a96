//! # CLI Menu
//!
//! Interactive numbered menu over the lot service.
//!
//! ## Loop
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  banner                                                                │
//! │    └── loop                                                            │
//! │         ├── menu + ">> Enter your choice: "                            │
//! │         ├── 0        → farewell, return                                │
//! │         ├── 1..=7    → action, then "Press ENTER to continue..."       │
//! │         ├── other    → "Invalid choice! Please enter 0-7."             │
//! │         └── EOF      → return                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Input and output are generic so tests can drive the loop with a
//! `Cursor` and a byte buffer.

pub mod render;

use std::io::{self, BufRead, Write};

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::error;

use parklot_core::{ValidationError, VehicleNo, VehicleType, DEFAULT_HISTORY_LIMIT};
use parklot_db::{LotError, ParkingLot};

pub use render::Render;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Terminal I/O failed: {0}")]
    Io(#[from] io::Error),
}

pub type CliResult<T> = Result<T, CliError>;

/// Whether the input stream is still open after an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Continue,
    Eof,
}

type Clock = Box<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// The interactive menu.
pub struct Menu<R, W> {
    lot: ParkingLot,
    input: R,
    output: W,
    history_limit: i64,
    render: Render,
    clock: Clock,
}

impl<R: BufRead, W: Write> Menu<R, W> {
    pub fn new(lot: ParkingLot, input: R, output: W) -> Self {
        Menu {
            lot,
            input,
            output,
            history_limit: DEFAULT_HISTORY_LIMIT,
            render: Render::local(),
            clock: Box::new(Utc::now),
        }
    }

    pub fn with_history_limit(mut self, limit: i64) -> Self {
        self.history_limit = limit;
        self
    }

    pub fn with_render(mut self, render: Render) -> Self {
        self.render = render;
        self
    }

    /// Replaces the wall clock used for entry and exit times.
    pub fn with_clock(mut self, clock: impl Fn() -> DateTime<Utc> + Send + Sync + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Runs until option 0 or end of input.
    pub async fn run(&mut self) -> CliResult<()> {
        self.render.banner(&mut self.output)?;

        loop {
            self.render.menu(&mut self.output)?;
            let Some(choice) = self.prompt(">> Enter your choice: ")? else {
                return Ok(());
            };

            let step = match choice.trim().parse::<u8>() {
                Ok(0) => {
                    self.render.farewell(&mut self.output)?;
                    self.output.flush()?;
                    return Ok(());
                }
                Ok(option @ 1..=7) => self.dispatch(option).await?,
                _ => {
                    writeln!(self.output, "Invalid choice! Please enter 0-7.")?;
                    writeln!(self.output)?;
                    continue;
                }
            };

            if step == Step::Eof {
                return Ok(());
            }

            if self.prompt("\nPress ENTER to continue...")?.is_none() {
                return Ok(());
            }
        }
    }

    async fn dispatch(&mut self, option: u8) -> CliResult<Step> {
        match option {
            1 => self.park().await,
            2 => self.exit().await,
            3 => self.status().await,
            4 => self.search().await,
            5 => self.parked().await,
            6 => self.history().await,
            _ => {
                self.render.pricing(&mut self.output)?;
                Ok(Step::Continue)
            }
        }
    }

    // =========================================================================
    // Actions
    // =========================================================================

    async fn park(&mut self) -> CliResult<Step> {
        writeln!(self.output, "\n--- PARK VEHICLE ---")?;

        let Some(raw_type) = self.prompt("Enter vehicle type (CAR/BIKE): ")? else {
            return Ok(Step::Eof);
        };
        let Ok(vehicle_type) = raw_type.parse::<VehicleType>() else {
            writeln!(self.output, "Invalid vehicle type! Please enter CAR or BIKE.")?;
            return Ok(Step::Continue);
        };

        let Some(vehicle_no) = self.read_vehicle_no("Enter vehicle number (e.g., UP14AB1234): ")? else {
            return Ok(Step::Eof);
        };
        let Some(vehicle_no) = vehicle_no else {
            return Ok(Step::Continue);
        };

        match self.lot.park(vehicle_type, &vehicle_no, (self.clock)()).await {
            Ok(receipt) => self.render.park_receipt(&mut self.output, &receipt)?,
            Err(err) => self.report(&err)?,
        }
        Ok(Step::Continue)
    }

    async fn exit(&mut self) -> CliResult<Step> {
        writeln!(self.output, "\n--- EXIT VEHICLE & BILLING ---")?;

        let Some(vehicle_no) = self.read_vehicle_no("Enter vehicle number: ")? else {
            return Ok(Step::Eof);
        };
        let Some(vehicle_no) = vehicle_no else {
            return Ok(Step::Continue);
        };

        match self.lot.exit(&vehicle_no, (self.clock)()).await {
            Ok(receipt) => self.render.bill(&mut self.output, &receipt)?,
            Err(err) => self.report(&err)?,
        }
        Ok(Step::Continue)
    }

    async fn status(&mut self) -> CliResult<Step> {
        match self.lot.status().await {
            Ok(status) => self.render.status(&mut self.output, &status)?,
            Err(err) => self.report(&err)?,
        }
        Ok(Step::Continue)
    }

    async fn search(&mut self) -> CliResult<Step> {
        writeln!(self.output, "\n--- SEARCH VEHICLE ---")?;

        let Some(vehicle_no) = self.read_vehicle_no("Enter vehicle number: ")? else {
            return Ok(Step::Eof);
        };
        let Some(vehicle_no) = vehicle_no else {
            return Ok(Step::Continue);
        };

        match self.lot.search(&vehicle_no, (self.clock)()).await {
            Ok(found) => {
                self.render
                    .search(&mut self.output, vehicle_no.as_str(), found.as_ref())?
            }
            Err(err) => self.report(&err)?,
        }
        Ok(Step::Continue)
    }

    async fn parked(&mut self) -> CliResult<Step> {
        match self.lot.parked((self.clock)()).await {
            Ok(parked) => self.render.parked(&mut self.output, &parked)?,
            Err(err) => self.report(&err)?,
        }
        Ok(Step::Continue)
    }

    async fn history(&mut self) -> CliResult<Step> {
        match self.lot.history(self.history_limit).await {
            Ok(tickets) => self.render.history(&mut self.output, &tickets)?,
            Err(err) => self.report(&err)?,
        }
        Ok(Step::Continue)
    }

    // =========================================================================
    // Input Helpers
    // =========================================================================

    /// Prints a prompt and reads one line. `None` on end of input.
    fn prompt(&mut self, prompt: &str) -> CliResult<Option<String>> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    /// Reads and validates a vehicle number.
    ///
    /// Outer `None` is end of input; inner `None` is rejected input, already
    /// reported to the user.
    fn read_vehicle_no(&mut self, prompt: &str) -> CliResult<Option<Option<VehicleNo>>> {
        let Some(raw) = self.prompt(prompt)? else {
            return Ok(None);
        };

        match VehicleNo::parse(&raw) {
            Ok(no) => Ok(Some(Some(no))),
            Err(ValidationError::Required { .. }) => {
                writeln!(self.output, "Vehicle number cannot be empty!")?;
                Ok(Some(None))
            }
            Err(err) => {
                writeln!(self.output, "✗ {err}")?;
                Ok(Some(None))
            }
        }
    }

    fn report(&mut self, err: &LotError) -> CliResult<()> {
        if let LotError::Db(db) = err {
            error!(error = %db, "Storage failure");
        }
        writeln!(self.output, "\n✗ {err}")?;
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use parklot_db::{Database, DbConfig};
    use std::io::Cursor;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 14, 9, 0, 0).unwrap()
    }

    async fn lot() -> ParkingLot {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let lot = ParkingLot::new(db);
        lot.provision_if_empty(&[(VehicleType::Car, 2), (VehicleType::Bike, 1)])
            .await
            .unwrap();
        lot
    }

    async fn run(lot: &ParkingLot, script: &str) -> String {
        let mut out = Vec::new();
        Menu::new(lot.clone(), Cursor::new(script), &mut out)
            .with_render(Render::utc())
            .with_clock(t0)
            .run()
            .await
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[tokio::test]
    async fn test_park_and_show_status() {
        let lot = lot().await;

        let out = run(&lot, "1\ncar\n up14ab1234 \n\n3\n\n0\n").await;

        assert!(out.contains("✓ Vehicle parked successfully!"));
        assert!(out.contains("Slot:            CAR-1"));
        assert!(out.contains("Entry Time:      14-10-2026 09:00:00"));
        assert!(out.contains("CAR-1 → UP14AB1234"));
        assert!(out.contains("Thank you for using Parklot"));
    }

    #[tokio::test]
    async fn test_exit_prints_bill() {
        let lot = lot().await;
        lot.park(
            VehicleType::Car,
            &VehicleNo::parse("UP14AB1234").unwrap(),
            t0() - Duration::minutes(150),
        )
        .await
        .unwrap();

        let out = run(&lot, "2\nUP14AB1234\n\n6\n\n0\n").await;

        assert!(out.contains("PARKING BILL"));
        assert!(out.contains("Duration:        3 hour(s)"));
        assert!(out.contains("Amount:          Rs.40.00"));
        // history view after the exit
        assert!(out.contains("Rs.40.00"));
        assert!(lot.search(&VehicleNo::parse("UP14AB1234").unwrap(), t0()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_invalid_choices() {
        let lot = lot().await;

        let out = run(&lot, "9\nabc\n0\n").await;

        assert_eq!(out.matches("Invalid choice! Please enter 0-7.").count(), 2);
    }

    #[tokio::test]
    async fn test_input_rejected_before_store() {
        let lot = lot().await;

        let out = run(&lot, "1\nTRUCK\n\n1\nBIKE\n   \n\n0\n").await;

        assert!(out.contains("Invalid vehicle type! Please enter CAR or BIKE."));
        assert!(out.contains("Vehicle number cannot be empty!"));

        let status = lot.status().await.unwrap();
        assert!(status.occupied.is_empty());
    }

    #[tokio::test]
    async fn test_lot_errors_are_printed() {
        let lot = lot().await;

        let out = run(&lot, "1\nBIKE\nKA01X1\n\n1\nBIKE\nKA01X2\n\n2\nNOPE1\n\n0\n").await;

        assert!(out.contains("✗ No space available for BIKE"));
        assert!(out.contains("✗ No active ticket found for vehicle number: NOPE1"));
    }

    #[tokio::test]
    async fn test_end_of_input_stops_cleanly() {
        let lot = lot().await;

        let out = run(&lot, "").await;
        assert!(out.contains("MAIN MENU"));

        // input closes mid-action
        let out = run(&lot, "1\nCAR\n").await;
        assert!(out.contains("Enter vehicle number"));
    }
}
