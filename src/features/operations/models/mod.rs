mod operation;

pub use operation::{
    CreateDailyLog, CreateInvitation, CreateOperation, DailyLog, InvitationStatus, MemberRole,
    Operation, OperationChanges, OperationInvitation, OperationMember, OperationStatus,
    StatusStamps,
};
