pub mod bill;
pub mod complaint;
pub mod contract;
pub mod notification;
pub mod room;
pub mod user;

pub use bill::{Bill, BillStatus, BillType, LineItem};
pub use complaint::{Complaint, ComplaintStatus};
pub use contract::{Contract, ContractStatus, CoTenant, TenantSnapshot};
pub use notification::{Notification, NotificationPriority};
pub use room::{Room, RoomStatus, Utility};
pub use user::{User, UserRole};
