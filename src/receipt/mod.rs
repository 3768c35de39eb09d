//! Receipt

use std::{fmt, io};

use rusty_money::iso::Currency;
use tabled::{
    builder::Builder,
    grid::config::HorizontalLine,
    settings::{
        Alignment, Color, Style, Theme,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    allocator::{Allocation, ExcludedGood, ExclusionReason},
    goods::Good,
    prices::format_minor,
    problem::VendorProblem,
    solution::{PurchaseToMake, VendorSolution},
};

/// Errors that can occur when writing a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// IO error
    #[error("IO error")]
    IO,
}

/// Purchases from a single vendor.
#[derive(Debug, Clone)]
pub struct VendorSection<G: Good> {
    /// Vendor name
    pub vendor: String,

    /// Purchases in solution order
    pub purchases: Vec<PurchaseToMake<G>>,

    /// Spend on goods, in minor units
    pub spend: i64,

    /// Minimum spend that applied, if any
    pub minimum: Option<i64>,

    /// Fixed fee charged
    pub fee: i64,
}

/// Printable summary of an allocation.
#[derive(Debug, Clone)]
pub struct Receipt<G: Good> {
    sections: Vec<VendorSection<G>>,
    excluded: Vec<ExcludedGood<G>>,
    total_cost: i64,
    vendor_fees: i64,
    currency: &'static Currency,
}

impl<G: Good> Receipt<G> {
    /// Build a receipt for `solution`, using `problem` for vendor minimums and fees.
    pub fn from_solution(
        problem: &VendorProblem<G>,
        solution: &VendorSolution<G>,
        currency: &'static Currency,
    ) -> Self {
        let sections = solution
            .vendors()
            .into_iter()
            .map(|vendor| {
                let purchases: Vec<PurchaseToMake<G>> = solution
                    .purchases_to_make()
                    .iter()
                    .filter(|purchase| purchase.option().vendor() == vendor)
                    .cloned()
                    .collect();

                let spend = purchases
                    .iter()
                    .map(|purchase| purchase.cost().unwrap_or(i64::MAX))
                    .fold(0_i64, i64::saturating_add);

                VendorSection {
                    vendor: vendor.to_string(),
                    purchases,
                    spend,
                    minimum: problem.minimum_purchase_for(vendor),
                    fee: problem.fee_for(vendor).max(0),
                }
            })
            .collect();

        Self {
            sections,
            excluded: Vec::new(),
            total_cost: solution.total_cost(),
            vendor_fees: solution.vendor_fees(),
            currency,
        }
    }

    /// Build a receipt for an allocation, including the goods it left out.
    pub fn from_allocation(
        problem: &VendorProblem<G>,
        allocation: &Allocation<G>,
        currency: &'static Currency,
    ) -> Self {
        let mut receipt = Self::from_solution(problem, &allocation.solution, currency);

        receipt.excluded.clone_from(&allocation.excluded);

        receipt
    }

    /// Purchases grouped by vendor, in order of first purchase.
    pub fn sections(&self) -> &[VendorSection<G>] {
        &self.sections
    }

    /// Goods that were sought but not bought.
    pub fn excluded(&self) -> &[ExcludedGood<G>] {
        &self.excluded
    }

    /// Cost of the goods, in minor units.
    pub fn total_cost(&self) -> i64 {
        self.total_cost
    }

    /// Vendor fees, in minor units.
    pub fn vendor_fees(&self) -> i64 {
        self.vendor_fees
    }

    /// Goods plus fees, in minor units.
    pub fn grand_total(&self) -> i64 {
        self.total_cost.saturating_add(self.vendor_fees)
    }

    /// Currency used for all monetary values.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }
}

impl<G: Good + fmt::Display> Receipt<G> {
    /// Writes the receipt as a table followed by the totals and any excluded goods.
    ///
    /// # Errors
    ///
    /// Returns an error if the receipt cannot be written.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), ReceiptError> {
        let mut builder = Builder::default();

        builder.push_record(["Vendor", "Good", "Qty", "Unit Price", "Line Total"]);

        let mut section_rows = Vec::with_capacity(self.sections.len());
        let mut row = 1; // header is row 0

        for section in &self.sections {
            section_rows.push(row);
            row += self.append_section_rows(&mut builder, section);
        }

        write_receipt_table(&mut out, builder, &section_rows)?;

        self.write_summary(&mut out)?;

        self.write_excluded(&mut out)
    }

    fn append_section_rows(&self, builder: &mut Builder, section: &VendorSection<G>) -> usize {
        let mut rows = 0;

        for (idx, purchase) in section.purchases.iter().enumerate() {
            let vendor = if idx == 0 {
                section.vendor.clone()
            } else {
                String::new()
            };

            builder.push_record([
                vendor,
                purchase.option().good().to_string(),
                purchase.quantity().to_string(),
                self.money(purchase.option().price()),
                self.money(purchase.cost().unwrap_or(i64::MAX)),
            ]);

            rows += 1;
        }

        let spend_label = match section.minimum {
            Some(minimum) => format!("Spend (minimum {})", self.money(minimum)),
            None => "Spend".to_string(),
        };

        builder.push_record([
            String::new(),
            spend_label,
            String::new(),
            String::new(),
            self.money(section.spend),
        ]);

        rows += 1;

        if section.fee > 0 {
            builder.push_record([
                String::new(),
                "Vendor fee".to_string(),
                String::new(),
                String::new(),
                self.money(section.fee),
            ]);

            rows += 1;
        }

        rows
    }

    fn write_summary(&self, out: &mut impl io::Write) -> Result<(), ReceiptError> {
        let goods_label = " Goods:";
        let fees_label = " Fees:";
        let total_label = " \x1b[1mTotal:\x1b[0m";

        let goods_val = format!("{}  ", self.money(self.total_cost));
        let fees_val = format!("{}  ", self.money(self.vendor_fees));
        let total_val = format!("{}  ", self.money(self.grand_total()));

        let label_width = visible_width(goods_label)
            .max(visible_width(fees_label))
            .max(visible_width(total_label));

        let value_width = visible_width(&goods_val)
            .max(visible_width(&fees_val))
            .max(visible_width(&total_val));

        write_summary_line(out, goods_label, &goods_val, label_width, value_width)?;
        write_summary_line(out, fees_label, &fees_val, label_width, value_width)?;

        write_summary_line(
            out,
            total_label,
            &format!("\x1b[1m{total_val}\x1b[0m"),
            label_width,
            value_width,
        )?;

        writeln!(out).map_err(|_err| ReceiptError::IO)
    }

    fn write_excluded(&self, out: &mut impl io::Write) -> Result<(), ReceiptError> {
        if self.excluded.is_empty() {
            return Ok(());
        }

        writeln!(out, " Not purchased:").map_err(|_err| ReceiptError::IO)?;

        for excluded in &self.excluded {
            let reason = match excluded.reason {
                ExclusionReason::TooExpensive { cheapest } => {
                    format!("too expensive, cheapest {}", self.money(cheapest))
                }
                ExclusionReason::NoOffers => "no offers".to_string(),
            };

            writeln!(
                out,
                "   {} x{} ({reason})",
                excluded.good, excluded.quantity
            )
            .map_err(|_err| ReceiptError::IO)?;
        }

        writeln!(out).map_err(|_err| ReceiptError::IO)
    }

    fn money(&self, minor_units: i64) -> String {
        format_minor(minor_units, self.currency)
    }
}

fn write_receipt_table(
    out: &mut impl io::Write,
    builder: Builder,
    section_rows: &[usize],
) -> Result<(), ReceiptError> {
    let mut table = builder.build();
    let mut theme = Theme::from(Style::modern_rounded());
    let separator = HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤'));

    theme.remove_horizontal_lines();
    theme.insert_horizontal_line(1, separator);

    for &row in section_rows {
        if row > 1 {
            theme.insert_horizontal_line(row, separator);
        }
    }

    table.with(theme);
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(2..5), Alignment::right());

    writeln!(out, "\n{table}").map_err(|_err| ReceiptError::IO)
}

/// Returns the visible (non-ANSI) width of a string.
fn visible_width(s: &str) -> usize {
    let mut width = 0usize;
    let mut in_escape = false;

    for ch in s.chars() {
        if in_escape {
            if ch.is_ascii_alphabetic() {
                in_escape = false;
            }
        } else if ch == '\x1b' {
            in_escape = true;
        } else {
            width += 1;
        }
    }

    width
}

/// Writes a summary line with a right-aligned label and a fixed-width value column.
fn write_summary_line(
    out: &mut impl io::Write,
    label: &str,
    value: &str,
    label_col_width: usize,
    value_col_width: usize,
) -> Result<(), ReceiptError> {
    let label_pad = label_col_width.saturating_sub(visible_width(label));
    let value_pad = value_col_width.saturating_sub(visible_width(value));

    writeln!(
        out,
        "{:>label_pad$}{label}  {value_pad}{value}",
        "",
        value_pad = " ".repeat(value_pad)
    )
    .map_err(|_err| ReceiptError::IO)
}
