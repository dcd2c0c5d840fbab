//! Client-side bill math for the invoice page. The server is
//! authoritative; these helpers only drive what the UI shows and which
//! buttons it enables. Payer identity (who may actually pay) comes from
//! the server's bill detail, which knows the contract.

use crate::types::{Bill, BillStatus};

/// Remaining balance of a bill. `amount_due` already is the remainder.
pub fn remaining_amount(bill: &Bill) -> i64 {
    bill.amount_due
}

/// Face value of a bill before any payments.
pub fn original_total(bill: &Bill) -> i64 {
    bill.amount_due + bill.amount_paid
}

/// Whether the pay buttons should show at all. PENDING_CASH_CONFIRM is
/// terminal from the tenant's point of view: only staff can move it.
pub fn is_payable(status: BillStatus) -> bool {
    matches!(status, BillStatus::Unpaid | BillStatus::PartiallyPaid)
}

/// Aggregates for the header cards on the invoice page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Totals {
    pub unpaid_total: i64,
    pub paid_total: i64,
}

pub fn compute_totals(bills: &[Bill]) -> Totals {
    let mut totals = Totals::default();
    for bill in bills {
        if bill.status == BillStatus::Paid {
            // Older rows may predate amount_paid bookkeeping
            totals.paid_total += if bill.amount_paid > 0 {
                bill.amount_paid
            } else {
                bill.amount_due
            };
        } else {
            totals.unpaid_total += bill.amount_due;
        }
    }
    totals
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BillType;
    use chrono::{NaiveDate, Utc};
    use uuid::Uuid;

    fn bill(status: BillStatus, amount_due: i64, amount_paid: i64) -> Bill {
        Bill {
            id: Uuid::new_v4(),
            contract_id: Uuid::new_v4(),
            tenant_id: None,
            bill_type: BillType::Monthly,
            status,
            amount_due,
            amount_paid,
            billing_date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            line_items: vec![],
            proof_image_path: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn payable_states() {
        assert!(is_payable(BillStatus::Unpaid));
        assert!(is_payable(BillStatus::PartiallyPaid));
        assert!(!is_payable(BillStatus::PendingCashConfirm));
        assert!(!is_payable(BillStatus::Paid));
    }

    #[test]
    fn partially_paid_bill_reports_its_face_value() {
        let b = bill(BillStatus::PartiallyPaid, 3_000_000, 2_000_000);
        assert_eq!(remaining_amount(&b), 3_000_000);
        assert_eq!(original_total(&b), 5_000_000);
    }

    #[test]
    fn totals_split_paid_from_outstanding() {
        let bills = vec![
            bill(BillStatus::Paid, 0, 5_000_000),
            bill(BillStatus::Paid, 2_000_000, 0), // legacy row, no amount_paid
            bill(BillStatus::PartiallyPaid, 3_000_000, 1_000_000),
            bill(BillStatus::Unpaid, 1_500_000, 0),
            bill(BillStatus::PendingCashConfirm, 2_500_000, 0),
        ];
        let totals = compute_totals(&bills);
        assert_eq!(totals.paid_total, 7_000_000);
        assert_eq!(totals.unpaid_total, 3_000_000 + 1_500_000 + 2_500_000);
    }
}
