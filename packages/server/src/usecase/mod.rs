//! UseCase 層
//!
//! 接続のライフサイクルに沿った操作（接続・状態取得・状態更新・切断）と、
//! それらが共有するファンアウト処理（RoomBroadcaster）を提供します。

pub mod connect_participant;
pub mod disconnect_participant;
pub mod error;
pub mod fetch_others;
pub mod get_room_state;
pub mod room_broadcaster;
pub mod update_participant;

pub use connect_participant::ConnectParticipantUseCase;
pub use disconnect_participant::DisconnectParticipantUseCase;
pub use error::{ConnectError, DisconnectError, UpdateError};
pub use fetch_others::FetchOthersUseCase;
pub use get_room_state::GetRoomStateUseCase;
pub use room_broadcaster::RoomBroadcaster;
pub use update_participant::UpdateParticipantUseCase;
