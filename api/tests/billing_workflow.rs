//! End-to-end exercises of the payment workflow logic, from payer
//! resolution through partial and full settlement.

use chrono::{NaiveDate, Utc};
use sqlx::types::Json;
use uuid::Uuid;

use rentcp_api::billing::{
    apply_gateway_payment, apply_payment, resolve_payer, BillTotals, PayerRole, PaymentApplyError,
};
use rentcp_api::models::contract::{CoTenant, Contract, ContractStatus};
use rentcp_api::models::{Bill, BillStatus, BillType};

fn contract(tenant_id: Option<Uuid>, co_tenants: Vec<CoTenant>) -> Contract {
    Contract {
        id: Uuid::new_v4(),
        room_id: Uuid::new_v4(),
        tenant_id,
        tenant_snapshot: None,
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

fn bill(contract_id: Uuid, tenant_id: Option<Uuid>, amount_due: i64) -> Bill {
    Bill {
        id: Uuid::new_v4(),
        contract_id,
        tenant_id,
        bill_type: BillType::Monthly,
        status: BillStatus::Unpaid,
        amount_due,
        amount_paid: 0,
        billing_date: NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
        line_items: Json(vec![]),
        transaction_refs: Json(vec![]),
        proof_image_path: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn co_tenant(user_id: Uuid) -> CoTenant {
    CoTenant {
        user_id: Some(user_id),
        full_name: "Nguyễn Văn B".to_string(),
        phone: None,
        status: "ACTIVE".to_string(),
    }
}

#[test]
fn partial_then_full_settlement() {
    let tenant = Uuid::new_v4();
    let c = contract(Some(tenant), vec![]);
    let mut b = bill(c.id, Some(tenant), 5_000_000);

    assert_eq!(resolve_payer(&b, &c, tenant), PayerRole::Primary);

    // First installment
    let status = apply_payment(&mut b, 2_000_000).unwrap();
    assert_eq!(status, BillStatus::PartiallyPaid);
    assert_eq!(b.amount_due, 3_000_000);
    assert_eq!(b.amount_paid, 2_000_000);
    assert_eq!(b.original_total(), 5_000_000);

    // Remainder
    let status = apply_payment(&mut b, 3_000_000).unwrap();
    assert_eq!(status, BillStatus::Paid);
    assert_eq!(b.amount_due, 0);
    assert_eq!(b.amount_paid, 5_000_000);

    // A settled bill accepts nothing further
    assert_eq!(
        apply_payment(&mut b, 1).unwrap_err(),
        PaymentApplyError::Overpayment {
            amount: 1,
            remaining: 0
        }
    );
}

#[test]
fn overpayment_leaves_the_bill_untouched() {
    let c = contract(Some(Uuid::new_v4()), vec![]);
    let mut b = bill(c.id, c.tenant_id, 1_500_000);

    let err = apply_payment(&mut b, 2_000_000).unwrap_err();
    assert_eq!(
        err,
        PaymentApplyError::Overpayment {
            amount: 2_000_000,
            remaining: 1_500_000
        }
    );
    assert_eq!(b.status, BillStatus::Unpaid);
    assert_eq!(b.amount_due, 1_500_000);
    assert_eq!(b.amount_paid, 0);
}

#[test]
fn co_tenants_can_view_but_not_pay() {
    let primary = Uuid::new_v4();
    let roommate = Uuid::new_v4();
    let stranger = Uuid::new_v4();
    let c = contract(Some(primary), vec![co_tenant(roommate)]);
    let b = bill(c.id, None, 4_000_000);

    assert_eq!(resolve_payer(&b, &c, primary), PayerRole::Primary);
    assert_eq!(resolve_payer(&b, &c, roommate), PayerRole::CoTenant);
    assert_eq!(resolve_payer(&b, &c, stranger), PayerRole::Unrelated);
}

#[test]
fn bill_level_tenant_takes_priority_over_contract() {
    let contract_tenant = Uuid::new_v4();
    let bill_tenant = Uuid::new_v4();
    let c = contract(Some(contract_tenant), vec![]);
    let b = bill(c.id, Some(bill_tenant), 2_000_000);

    assert_eq!(resolve_payer(&b, &c, bill_tenant), PayerRole::Primary);
    // The contract holder is not the payer of a bill assigned to someone else
    assert_ne!(resolve_payer(&b, &c, contract_tenant), PayerRole::Primary);
}

#[test]
fn cash_flow_waits_for_confirmation() {
    let c = contract(Some(Uuid::new_v4()), vec![]);
    let mut b = bill(c.id, c.tenant_id, 3_000_000);

    assert!(b.status.can_transition_to(BillStatus::PendingCashConfirm));
    b.status = BillStatus::PendingCashConfirm;

    // While pending, partial settlements are rejected
    assert_eq!(
        apply_payment(&mut b, 1_000_000).unwrap_err(),
        PaymentApplyError::NotPayable(BillStatus::PendingCashConfirm)
    );
    assert!(!b.status.can_transition_to(BillStatus::Unpaid));
    assert!(!b.status.can_transition_to(BillStatus::PartiallyPaid));

    // Staff confirmation settles the whole remainder
    assert_eq!(apply_payment(&mut b, 3_000_000).unwrap(), BillStatus::Paid);
}

#[test]
fn replayed_gateway_return_credits_only_once() {
    let c = contract(Some(Uuid::new_v4()), vec![]);
    let mut b = bill(c.id, c.tenant_id, 5_000_000);

    // First visit to the return URL applies the partial payment
    assert_eq!(
        apply_gateway_payment(&mut b, 1_000_000, "14226112").unwrap(),
        BillStatus::PartiallyPaid
    );
    assert_eq!(b.amount_paid, 1_000_000);

    // Refreshing the page replays the identical signed parameters; the
    // same transaction must not be credited a second time
    assert_eq!(
        apply_gateway_payment(&mut b, 1_000_000, "14226112").unwrap_err(),
        PaymentApplyError::DuplicateTransaction("14226112".to_string())
    );
    assert_eq!(b.amount_paid, 1_000_000);
    assert_eq!(b.amount_due, 4_000_000);
    assert_eq!(b.status, BillStatus::PartiallyPaid);
}

#[test]
fn totals_over_a_mixed_bill_list() {
    let c = contract(Some(Uuid::new_v4()), vec![]);
    let mut paid = bill(c.id, c.tenant_id, 5_000_000);
    apply_payment(&mut paid, 5_000_000).unwrap();

    let mut partial = bill(c.id, c.tenant_id, 4_000_000);
    apply_payment(&mut partial, 1_000_000).unwrap();

    let unpaid = bill(c.id, c.tenant_id, 2_500_000);

    let totals = BillTotals::compute(&[paid, partial, unpaid]);
    // Non-PAID bills contribute their remaining balance
    assert_eq!(totals.unpaid_total, 3_000_000 + 2_500_000);
    assert_eq!(totals.paid_total, 5_000_000);
}
