//! Invoice Models

use serde::{Deserialize, Serialize};

/// Stored invoice status, derived from paid vs. total amount.
///
/// `overdue` is intentionally not a stored state: it depends on the
/// current date, so it is computed at read time (see
/// [`Invoice::effective_status`]) to avoid going stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum InvoiceStatus {
    Unpaid,
    Partial,
    Paid,
}

impl InvoiceStatus {
    /// Derive the stored status from amounts.
    pub fn derive(paid_amount: f64, total_amount: f64) -> Self {
        if paid_amount <= 0.0 {
            InvoiceStatus::Unpaid
        } else if paid_amount < total_amount {
            InvoiceStatus::Partial
        } else {
            InvoiceStatus::Paid
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Unpaid => "unpaid",
            InvoiceStatus::Partial => "partial",
            InvoiceStatus::Paid => "paid",
        }
    }
}

/// Read-time invoice status: the stored status plus `overdue`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectiveInvoiceStatus {
    Unpaid,
    Partial,
    Paid,
    Overdue,
}

/// Invoice entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Invoice {
    pub id: i64,
    /// Human-readable number, `INV-<year>-<seq:03>`
    pub invoice_no: String,
    pub order_id: i64,
    pub chandler_id: i64,
    pub issue_date: i64,
    pub due_date: i64,
    pub status: InvoiceStatus,
    pub total_amount: f64,
    pub paid_amount: f64,
    pub notes: Option<String>,
}

impl Invoice {
    /// Read-time status: `overdue` when past due and not fully paid,
    /// otherwise the stored status.
    pub fn effective_status(&self, now_millis: i64) -> EffectiveInvoiceStatus {
        if self.status != InvoiceStatus::Paid && now_millis > self.due_date {
            return EffectiveInvoiceStatus::Overdue;
        }
        match self.status {
            InvoiceStatus::Unpaid => EffectiveInvoiceStatus::Unpaid,
            InvoiceStatus::Partial => EffectiveInvoiceStatus::Partial,
            InvoiceStatus::Paid => EffectiveInvoiceStatus::Paid,
        }
    }
}

/// Create invoice payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceCreate {
    pub order_id: i64,
    pub chandler_id: i64,
    /// Defaults to now
    pub issue_date: Option<i64>,
    pub due_date: i64,
    pub total_amount: f64,
    /// Defaults to 0
    pub paid_amount: Option<f64>,
    pub notes: Option<String>,
}

/// Update invoice payload — status is re-derived when amounts change
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InvoiceUpdate {
    pub paid_amount: Option<f64>,
    pub due_date: Option<i64>,
    pub notes: Option<String>,
}

/// Invoice response with the read-time status attached
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceView {
    #[serde(flatten)]
    pub invoice: Invoice,
    pub effective_status: EffectiveInvoiceStatus,
}

impl InvoiceView {
    pub fn at(invoice: Invoice, now_millis: i64) -> Self {
        let effective_status = invoice.effective_status(now_millis);
        Self {
            invoice,
            effective_status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invoice(status: InvoiceStatus, due_date: i64) -> Invoice {
        Invoice {
            id: 1,
            invoice_no: "INV-2026-001".into(),
            order_id: 1,
            chandler_id: 1,
            issue_date: 0,
            due_date,
            status,
            total_amount: 1000.0,
            paid_amount: 0.0,
            notes: None,
        }
    }

    #[test]
    fn status_derivation_from_amounts() {
        assert_eq!(InvoiceStatus::derive(0.0, 1000.0), InvoiceStatus::Unpaid);
        assert_eq!(InvoiceStatus::derive(400.0, 1000.0), InvoiceStatus::Partial);
        assert_eq!(InvoiceStatus::derive(1000.0, 1000.0), InvoiceStatus::Paid);
        assert_eq!(InvoiceStatus::derive(1200.0, 1000.0), InvoiceStatus::Paid);
    }

    #[test]
    fn effective_status_goes_overdue_past_due_date() {
        let inv = invoice(InvoiceStatus::Partial, 1000);
        assert_eq!(
            inv.effective_status(999),
            EffectiveInvoiceStatus::Partial
        );
        assert_eq!(
            inv.effective_status(1001),
            EffectiveInvoiceStatus::Overdue
        );
    }

    #[test]
    fn paid_invoice_is_never_overdue() {
        let inv = invoice(InvoiceStatus::Paid, 1000);
        assert_eq!(inv.effective_status(5000), EffectiveInvoiceStatus::Paid);
    }
}
