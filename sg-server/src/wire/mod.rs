pub mod envelope;
pub mod payload;

pub use envelope::{ErrorBody, RpcRequest, RpcResponse};
pub use payload::{
    AckBody, ChangeUsernameRequest, ConnectionEntry, ConnectionsBody, EdgeRequest, EmailProbe,
    GetUserRequest, LoginRequest, PageRequest, ProfileUpdateRequest, RequestPayload,
    ResponsePayload, SessionBody, SignupRequest, UserBody, UsernameProbe,
};
