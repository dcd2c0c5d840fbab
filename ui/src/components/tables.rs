// Table helpers and status badges
use leptos::*;

use crate::types::{BillStatus, ComplaintStatus, RoomStatus};

#[component]
pub fn BillStatusBadge(status: BillStatus) -> impl IntoView {
    let class = match status {
        BillStatus::Unpaid => "bg-red-100 text-red-800",
        BillStatus::PartiallyPaid => "bg-yellow-100 text-yellow-800",
        BillStatus::PendingCashConfirm => "bg-blue-100 text-blue-800",
        BillStatus::Paid => "bg-green-100 text-green-800",
    };
    view! {
        <span class=format!("inline-flex px-2 py-1 text-xs font-medium rounded-full {}", class)>
            {status.label()}
        </span>
    }
}

#[component]
pub fn ComplaintStatusBadge(status: ComplaintStatus) -> impl IntoView {
    let class = match status {
        ComplaintStatus::Pending => "bg-yellow-100 text-yellow-800",
        ComplaintStatus::InProgress => "bg-blue-100 text-blue-800",
        ComplaintStatus::Resolved => "bg-green-100 text-green-800",
        ComplaintStatus::Rejected => "bg-gray-200 text-gray-700",
    };
    view! {
        <span class=format!("inline-flex px-2 py-1 text-xs font-medium rounded-full {}", class)>
            {status.label()}
        </span>
    }
}

#[component]
pub fn RoomStatusBadge(status: RoomStatus) -> impl IntoView {
    let (class, label) = match status {
        RoomStatus::Available => ("bg-green-100 text-green-800", "Còn trống"),
        RoomStatus::Occupied => ("bg-red-100 text-red-800", "Đã thuê"),
        RoomStatus::Maintenance => ("bg-gray-200 text-gray-700", "Bảo trì"),
    };
    view! {
        <span class=format!("inline-flex px-2 py-1 text-xs font-medium rounded-full {}", class)>
            {label}
        </span>
    }
}
