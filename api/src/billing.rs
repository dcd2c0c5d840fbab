//! Invoice payment workflow: payer resolution, amount math, and the
//! aggregate totals shown on the tenant's bill list.
//!
//! The status transition table itself lives on [`BillStatus`]; everything
//! here is pure and shared by the bill/payment handlers.

use serde::Serialize;
use uuid::Uuid;

use crate::models::{Bill, BillStatus, Contract};

/// Relationship of a user to a bill's contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayerRole {
    /// The contract's principal party, sole authorized payer.
    Primary,
    /// Listed in the contract's co-tenants; may view but not pay.
    CoTenant,
    Unrelated,
}

/// Resolve who `user_id` is with respect to a bill.
///
/// Identity fields are consulted in priority order: the bill's own
/// tenant_id, then the contract's tenant_id, then the contract's co-tenant
/// entries.
pub fn resolve_payer(bill: &Bill, contract: &Contract, user_id: Uuid) -> PayerRole {
    if bill.tenant_id == Some(user_id) {
        return PayerRole::Primary;
    }
    if contract.tenant_id == Some(user_id) {
        // Only primary when the bill doesn't name a different tenant
        if bill.tenant_id.is_none() {
            return PayerRole::Primary;
        }
    }
    if contract.is_co_tenant(user_id) {
        return PayerRole::CoTenant;
    }
    // A contract tenant looking at a bill assigned to someone else still
    // counts as a co-occupant for viewing purposes
    if contract.tenant_id == Some(user_id) {
        return PayerRole::CoTenant;
    }
    PayerRole::Unrelated
}

/// Display aggregates over a tenant's bill list, recomputed on every load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BillTotals {
    /// Sum of `amount_due` across every non-PAID bill. Partial payments are
    /// not netted out here beyond what `amount_due` already reflects.
    pub unpaid_total: i64,
    /// Sum of `amount_paid` (or `amount_due` when amount_paid is zero)
    /// across PAID bills only.
    pub paid_total: i64,
}

impl BillTotals {
    pub fn compute(bills: &[Bill]) -> Self {
        let mut totals = BillTotals::default();
        for bill in bills {
            if bill.status.is_paid() {
                totals.paid_total += if bill.amount_paid != 0 {
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
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PaymentApplyError {
    #[error("payment amount must be positive")]
    NonPositiveAmount,
    #[error("payment of {amount} exceeds remaining balance of {remaining}")]
    Overpayment { amount: i64, remaining: i64 },
    #[error("bill status {0:?} does not accept payments")]
    NotPayable(BillStatus),
    #[error("transaction {0} was already applied to this bill")]
    DuplicateTransaction(String),
}

/// Apply a confirmed payment to a bill, deriving the next status.
///
/// Mutates the bill in place only when the whole application is valid.
pub fn apply_payment(bill: &mut Bill, amount: i64) -> Result<BillStatus, PaymentApplyError> {
    if amount <= 0 {
        return Err(PaymentApplyError::NonPositiveAmount);
    }
    let remaining = bill.remaining_amount();
    if amount > remaining {
        return Err(PaymentApplyError::Overpayment { amount, remaining });
    }
    let next = if amount == remaining {
        BillStatus::Paid
    } else {
        BillStatus::PartiallyPaid
    };
    if !bill.status.can_transition_to(next) {
        return Err(PaymentApplyError::NotPayable(bill.status));
    }
    bill.amount_due -= amount;
    bill.amount_paid += amount;
    bill.status = next;
    Ok(next)
}

/// Apply a verified gateway payment, recording its transaction ref.
///
/// Gateways redirect the payer back with a signed query string; a refresh
/// of that URL replays the same verified parameters, so the ref of every
/// credited transaction is kept on the bill and replays are rejected
/// before any amounts move.
pub fn apply_gateway_payment(
    bill: &mut Bill,
    amount: i64,
    transaction_ref: &str,
) -> Result<BillStatus, PaymentApplyError> {
    if bill.transaction_refs.0.iter().any(|r| r == transaction_ref) {
        return Err(PaymentApplyError::DuplicateTransaction(
            transaction_ref.to_string(),
        ));
    }
    let next = apply_payment(bill, amount)?;
    bill.transaction_refs.0.push(transaction_ref.to_string());
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BillType, CoTenant, ContractStatus, TenantSnapshot};
    use chrono::{NaiveDate, Utc};
    use sqlx::types::Json;

    fn bill(status: BillStatus, amount_due: i64, amount_paid: i64, tenant: Option<Uuid>) -> Bill {
        Bill {
            id: Uuid::new_v4(),
            contract_id: Uuid::new_v4(),
            tenant_id: tenant,
            bill_type: BillType::Monthly,
            status,
            amount_due,
            amount_paid,
            billing_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            line_items: Json(vec![]),
            transaction_refs: Json(vec![]),
            proof_image_path: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn contract(tenant: Option<Uuid>, co_tenants: Vec<CoTenant>) -> Contract {
        Contract {
            id: Uuid::new_v4(),
            room_id: Uuid::new_v4(),
            tenant_id: tenant,
            tenant_snapshot: tenant.is_none().then(|| {
                Json(TenantSnapshot {
                    full_name: "Nguyen Van A".to_string(),
                    phone: None,
                    email: None,
                })
            }),
            co_tenants: Json(co_tenants),
            start_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            end_date: None,
            deposit: 3_000_000,
            monthly_rent: 5_000_000,
            status: ContractStatus::Active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn co_tenant(user_id: Uuid) -> CoTenant {
        CoTenant {
            user_id: Some(user_id),
            full_name: "Co Tenant".to_string(),
            phone: None,
            status: "ACTIVE".to_string(),
        }
    }

    #[test]
    fn primary_tenant_resolved_from_bill_first() {
        let payer = Uuid::new_v4();
        let other = Uuid::new_v4();
        let b = bill(BillStatus::Unpaid, 5_000_000, 0, Some(payer));
        let c = contract(Some(other), vec![]);
        assert_eq!(resolve_payer(&b, &c, payer), PayerRole::Primary);
    }

    #[test]
    fn primary_tenant_falls_back_to_contract() {
        let payer = Uuid::new_v4();
        let b = bill(BillStatus::Unpaid, 5_000_000, 0, None);
        let c = contract(Some(payer), vec![]);
        assert_eq!(resolve_payer(&b, &c, payer), PayerRole::Primary);
    }

    #[test]
    fn co_tenant_may_view_but_not_pay() {
        // Scenario: user id matches a co-tenant entry but not the contract's
        // tenant_id; the payment action must be withheld
        let primary = Uuid::new_v4();
        let secondary = Uuid::new_v4();
        let b = bill(BillStatus::Unpaid, 5_000_000, 0, Some(primary));
        let c = contract(Some(primary), vec![co_tenant(secondary)]);
        assert_eq!(resolve_payer(&b, &c, secondary), PayerRole::CoTenant);
    }

    #[test]
    fn stranger_is_unrelated() {
        let b = bill(BillStatus::Unpaid, 5_000_000, 0, Some(Uuid::new_v4()));
        let c = contract(Some(Uuid::new_v4()), vec![co_tenant(Uuid::new_v4())]);
        assert_eq!(resolve_payer(&b, &c, Uuid::new_v4()), PayerRole::Unrelated);
    }

    #[test]
    fn unpaid_total_sums_amount_due_of_non_paid_bills() {
        let bills = vec![
            bill(BillStatus::Unpaid, 5_000_000, 0, None),
            bill(BillStatus::PendingCashConfirm, 2_500_000, 0, None),
            bill(BillStatus::PartiallyPaid, 2_000_000, 3_000_000, None),
            bill(BillStatus::Paid, 0, 4_000_000, None),
        ];
        let totals = BillTotals::compute(&bills);
        assert_eq!(totals.unpaid_total, 9_500_000);
    }

    #[test]
    fn paid_total_prefers_amount_paid_and_falls_back_to_amount_due() {
        let bills = vec![
            bill(BillStatus::Paid, 0, 4_000_000, None),
            // Historical row where amount_due was never zeroed and
            // amount_paid never recorded
            bill(BillStatus::Paid, 1_500_000, 0, None),
            bill(BillStatus::Unpaid, 9_000_000, 0, None),
        ];
        let totals = BillTotals::compute(&bills);
        assert_eq!(totals.paid_total, 5_500_000);
    }

    #[test]
    fn remaining_and_original_amounts() {
        // Scenario: amount_due 2_000_000, amount_paid 3_000_000 → remaining
        // 2_000_000, original total 5_000_000
        let b = bill(BillStatus::PartiallyPaid, 2_000_000, 3_000_000, None);
        assert_eq!(b.remaining_amount(), 2_000_000);
        assert_eq!(b.original_total(), 5_000_000);
    }

    #[test]
    fn full_payment_marks_paid() {
        let mut b = bill(BillStatus::Unpaid, 5_000_000, 0, None);
        assert_eq!(apply_payment(&mut b, 5_000_000), Ok(BillStatus::Paid));
        assert_eq!(b.amount_due, 0);
        assert_eq!(b.amount_paid, 5_000_000);
    }

    #[test]
    fn partial_payment_marks_partially_paid_and_can_repeat() {
        let mut b = bill(BillStatus::Unpaid, 5_000_000, 0, None);
        assert_eq!(
            apply_payment(&mut b, 3_000_000),
            Ok(BillStatus::PartiallyPaid)
        );
        assert_eq!(b.remaining_amount(), 2_000_000);
        assert_eq!(apply_payment(&mut b, 2_000_000), Ok(BillStatus::Paid));
        assert_eq!(b.original_total(), 5_000_000);
    }

    #[test]
    fn overpayment_rejected_without_mutation() {
        let mut b = bill(BillStatus::PartiallyPaid, 2_000_000, 3_000_000, None);
        let err = apply_payment(&mut b, 2_500_000).unwrap_err();
        assert_eq!(
            err,
            PaymentApplyError::Overpayment {
                amount: 2_500_000,
                remaining: 2_000_000
            }
        );
        assert_eq!(b.status, BillStatus::PartiallyPaid);
        assert_eq!(b.amount_due, 2_000_000);
    }

    #[test]
    fn paid_bill_accepts_no_payment() {
        let mut b = bill(BillStatus::Paid, 0, 5_000_000, None);
        assert_eq!(
            apply_payment(&mut b, 1),
            Err(PaymentApplyError::Overpayment {
                amount: 1,
                remaining: 0
            })
        );
    }

    #[test]
    fn replayed_transaction_ref_is_rejected_without_mutation() {
        let mut b = bill(BillStatus::Unpaid, 5_000_000, 0, None);
        assert_eq!(
            apply_gateway_payment(&mut b, 1_000_000, "VNP-001"),
            Ok(BillStatus::PartiallyPaid)
        );

        // Refreshing the return URL replays the same verified parameters
        let err = apply_gateway_payment(&mut b, 1_000_000, "VNP-001").unwrap_err();
        assert_eq!(
            err,
            PaymentApplyError::DuplicateTransaction("VNP-001".to_string())
        );
        assert_eq!(b.amount_paid, 1_000_000);
        assert_eq!(b.amount_due, 4_000_000);

        // A genuinely new transaction still goes through
        assert_eq!(
            apply_gateway_payment(&mut b, 4_000_000, "VNP-002"),
            Ok(BillStatus::Paid)
        );
        assert_eq!(b.transaction_refs.0, vec!["VNP-001", "VNP-002"]);
    }

    #[test]
    fn rejected_payment_records_no_transaction_ref() {
        let mut b = bill(BillStatus::PartiallyPaid, 2_000_000, 3_000_000, None);
        assert!(apply_gateway_payment(&mut b, 2_500_000, "VNP-003").is_err());
        assert!(b.transaction_refs.0.is_empty());
    }

    #[test]
    fn pending_cash_confirm_is_terminal_for_the_tenant() {
        assert!(!BillStatus::PendingCashConfirm.can_transition_to(BillStatus::PartiallyPaid));
        assert!(!BillStatus::PendingCashConfirm.can_transition_to(BillStatus::Unpaid));
        assert!(BillStatus::PendingCashConfirm.can_transition_to(BillStatus::Paid));
    }
}
