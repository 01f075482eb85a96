//! Text rendering for the CLI menu.
//!
//! Every screen is written to a `Write` so the menu can be tested against
//! a byte buffer. Timestamps are shown in a fixed offset chosen at startup.

use std::io::{self, Write};

use chrono::{DateTime, FixedOffset, Local, Offset, Utc};

use parklot_core::billing::Tariff;
use parklot_core::report::{ExitReceipt, LotStatus, ParkReceipt, ParkedVehicle, VehicleLookup};
use parklot_core::{Money, Ticket, VehicleType};

const RULE: &str = "──────────────────────────────────────────────────";
const TIME_FORMAT: &str = "%d-%m-%Y %H:%M:%S";
const SHORT_TIME_FORMAT: &str = "%d-%m %H:%M";

/// Formats lot reports as text.
#[derive(Debug, Clone, Copy)]
pub struct Render {
    offset: FixedOffset,
}

impl Render {
    /// Renders in the machine's current local offset.
    pub fn local() -> Self {
        Render {
            offset: Local::now().offset().fix(),
        }
    }

    pub fn utc() -> Self {
        Render {
            offset: Utc.fix(),
        }
    }

    fn time(&self, at: DateTime<Utc>) -> String {
        at.with_timezone(&self.offset).format(TIME_FORMAT).to_string()
    }

    fn short_time(&self, at: DateTime<Utc>) -> String {
        at.with_timezone(&self.offset).format(SHORT_TIME_FORMAT).to_string()
    }

    pub fn banner(&self, out: &mut impl Write) -> io::Result<()> {
        writeln!(out, "{RULE}")?;
        writeln!(out, "  PARKLOT  ·  parking lot management")?;
        writeln!(out, "{RULE}")?;
        writeln!(out)
    }

    pub fn menu(&self, out: &mut impl Write) -> io::Result<()> {
        writeln!(out, "{RULE}")?;
        writeln!(out, "  MAIN MENU")?;
        writeln!(out, "{RULE}")?;
        writeln!(out, "  1. Park Vehicle (CAR/BIKE)")?;
        writeln!(out, "  2. Exit Vehicle & Generate Bill")?;
        writeln!(out, "  3. Show Parking Status")?;
        writeln!(out, "  4. Search Vehicle by Number")?;
        writeln!(out, "  5. View All Parked Vehicles")?;
        writeln!(out, "  6. View Parking History")?;
        writeln!(out, "  7. Show Pricing Information")?;
        writeln!(out, "  0. Exit System")?;
        writeln!(out, "{RULE}")
    }

    pub fn farewell(&self, out: &mut impl Write) -> io::Result<()> {
        writeln!(out)?;
        writeln!(out, "Thank you for using Parklot. Drive safe!")
    }

    pub fn park_receipt(&self, out: &mut impl Write, receipt: &ParkReceipt) -> io::Result<()> {
        writeln!(out)?;
        writeln!(out, "✓ Vehicle parked successfully!")?;
        writeln!(out, "{RULE}")?;
        writeln!(out, "  Ticket ID:       {}", receipt.ticket_id)?;
        writeln!(out, "  Slot:            {}", receipt.slot)?;
        writeln!(out, "  Vehicle Number:  {}", receipt.vehicle_no)?;
        writeln!(out, "  Entry Time:      {}", self.time(receipt.entry_time))?;
        writeln!(out, "{RULE}")
    }

    pub fn bill(&self, out: &mut impl Write, receipt: &ExitReceipt) -> io::Result<()> {
        let ticket = &receipt.ticket;
        let exit = receipt
            .exit_time()
            .map(|t| self.time(t))
            .unwrap_or_else(|| "-".to_string());

        writeln!(out)?;
        writeln!(out, "{RULE}")?;
        writeln!(out, "  PARKING BILL")?;
        writeln!(out, "{RULE}")?;
        writeln!(out, "  Vehicle Number:  {}", ticket.vehicle_no)?;
        writeln!(out, "  Vehicle Type:    {}", ticket.vehicle_type)?;
        writeln!(out, "  Entry Time:      {}", self.time(ticket.entry_time))?;
        writeln!(out, "  Exit Time:       {}", exit)?;
        writeln!(out, "  Duration:        {} hour(s)", receipt.bill.hours)?;
        writeln!(out, "  Amount:          Rs.{}", receipt.bill.amount)?;
        writeln!(out, "{RULE}")
    }

    pub fn status(&self, out: &mut impl Write, status: &LotStatus) -> io::Result<()> {
        writeln!(out)?;
        writeln!(out, "{RULE}")?;
        writeln!(out, "  PARKING LOT STATUS")?;
        writeln!(out, "{RULE}")?;

        for (vehicle_type, occupancy) in status.iter() {
            writeln!(out, "  {} slots", vehicle_type)?;
            writeln!(out, "    Total:      {}", occupancy.total)?;
            writeln!(out, "    Available:  {}", occupancy.available)?;
            writeln!(out, "    Occupied:   {}", occupancy.occupied())?;
        }

        writeln!(out, "{RULE}")?;
        writeln!(out, "  OCCUPIED SLOTS")?;
        if status.occupied.is_empty() {
            writeln!(out, "    (none)")?;
        }
        for slot in &status.occupied {
            writeln!(out, "    {} → {}", slot.label(), slot.vehicle_no)?;
        }
        writeln!(out, "{RULE}")
    }

    pub fn search(
        &self,
        out: &mut impl Write,
        vehicle_no: &str,
        lookup: Option<&VehicleLookup>,
    ) -> io::Result<()> {
        writeln!(out)?;
        let Some(lookup) = lookup else {
            return writeln!(out, "✗ Vehicle {vehicle_no} is not parked");
        };

        writeln!(out, "✓ Vehicle found")?;
        writeln!(out, "  Ticket ID:       {}", lookup.ticket_id)?;
        writeln!(out, "  Vehicle Number:  {}", lookup.vehicle_no)?;
        writeln!(out, "  Vehicle Type:    {}", lookup.vehicle_type)?;
        writeln!(out, "  Entry Time:      {}", self.time(lookup.entry_time))?;
        writeln!(out, "  Parked For:      {}", lookup.elapsed)
    }

    pub fn parked(&self, out: &mut impl Write, parked: &[ParkedVehicle]) -> io::Result<()> {
        writeln!(out)?;
        if parked.is_empty() {
            return writeln!(out, "No vehicles currently parked.");
        }

        writeln!(out, "{:<10} {:<14} {:<6} {}", "SLOT", "VEHICLE", "TYPE", "DURATION")?;
        writeln!(out, "{RULE}")?;
        for row in parked {
            writeln!(
                out,
                "{:<10} {:<14} {:<6} {}",
                row.slot.to_string(),
                row.vehicle_no,
                row.vehicle_type.as_str(),
                row.elapsed
            )?;
        }
        writeln!(out, "{RULE}")?;
        writeln!(out, "Total parked: {}", parked.len())
    }

    pub fn history(&self, out: &mut impl Write, tickets: &[Ticket]) -> io::Result<()> {
        writeln!(out)?;
        if tickets.is_empty() {
            return writeln!(out, "No parking history yet.");
        }

        writeln!(
            out,
            "{:<14} {:<6} {:<12} {:<12} {}",
            "VEHICLE", "TYPE", "ENTRY", "EXIT", "AMOUNT"
        )?;
        writeln!(out, "{RULE}")?;
        for ticket in tickets {
            let exit = ticket
                .exit_time
                .map(|t| self.short_time(t))
                .unwrap_or_else(|| "-".to_string());
            writeln!(
                out,
                "{:<14} {:<6} {:<12} {:<12} Rs.{}",
                ticket.vehicle_no,
                ticket.vehicle_type.as_str(),
                self.short_time(ticket.entry_time),
                exit,
                ticket.amount().unwrap_or_default()
            )?;
        }
        writeln!(out, "{RULE}")
    }

    pub fn pricing(&self, out: &mut impl Write) -> io::Result<()> {
        writeln!(out)?;
        writeln!(out, "{RULE}")?;
        writeln!(out, "  PRICING INFORMATION")?;
        writeln!(out, "{RULE}")?;

        for vehicle_type in VehicleType::ALL {
            let Tariff {
                base_hours,
                base_fee,
                extra_per_hour,
            } = vehicle_type.tariff();

            writeln!(out, "  {} PARKING", vehicle_type)?;
            writeln!(out, "    First {} hours:  {}", base_hours, rupees(base_fee))?;
            writeln!(
                out,
                "    After {} hours:  {} per hour",
                base_hours,
                rupees(extra_per_hour)
            )?;
        }

        writeln!(out)?;
        writeln!(out, "  Minimum billing: 1 hour")?;
        writeln!(out, "  Duration rounded up to nearest hour")?;
        writeln!(out, "{RULE}")
    }
}

/// `Rs.30` for whole amounts, `Rs.12.50` otherwise.
fn rupees(amount: Money) -> String {
    if amount.minor_part() == 0 {
        format!("Rs.{}", amount.major())
    } else {
        format!("Rs.{}", amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use parklot_core::SlotLabel;

    fn render_to_string(f: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_pricing_lists_each_tariff() {
        let text = render_to_string(|out| Render::utc().pricing(out));

        assert!(text.contains("CAR PARKING"));
        assert!(text.contains("First 2 hours:  Rs.30"));
        assert!(text.contains("After 2 hours:  Rs.10 per hour"));
        assert!(text.contains("BIKE PARKING"));
        assert!(text.contains("First 2 hours:  Rs.20"));
        assert!(text.contains("After 2 hours:  Rs.5 per hour"));
        assert!(text.contains("Minimum billing: 1 hour"));
    }

    #[test]
    fn test_park_receipt_uses_offset() {
        let receipt = ParkReceipt {
            ticket_id: 7,
            slot: SlotLabel::new(VehicleType::Bike, 3),
            vehicle_no: "KA01X1".into(),
            vehicle_type: VehicleType::Bike,
            entry_time: Utc.with_ymd_and_hms(2026, 10, 14, 9, 5, 0).unwrap(),
        };

        let ist = Render {
            offset: FixedOffset::east_opt(5 * 3600 + 1800).unwrap(),
        };
        let text = render_to_string(|out| ist.park_receipt(out, &receipt));

        assert!(text.contains("Ticket ID:       7"));
        assert!(text.contains("Slot:            BIKE-3"));
        assert!(text.contains("14-10-2026 14:35:00"));
    }

    #[test]
    fn test_rupees() {
        assert_eq!(rupees(Money::from_major(30)), "Rs.30");
        assert_eq!(rupees(Money::from_cents(1250)), "Rs.12.50");
    }
}
