//! Dependency wiring.

use std::{collections::HashMap, sync::Arc};

use tokio::sync::Mutex;

use crate::{
    domain::Room,
    infrastructure::{
        message_pusher::WebSocketMessagePusher, repository::InMemoryParticipantRepository,
    },
    ui::state::AppState,
    usecase::{
        ConnectParticipantUseCase, DisconnectParticipantUseCase, FetchOthersUseCase,
        GetRoomStateUseCase, RoomBroadcaster, UpdateParticipantUseCase,
    },
};

/// Build the shared application state around `room`
///
/// Dependencies are initialized in order:
/// 1. Repository
/// 2. MessagePusher
/// 3. RoomBroadcaster
/// 4. UseCases
/// 5. AppState
pub fn build_app_state(room: Room) -> Arc<AppState> {
    let room_id = room.id.clone();

    // 1. Create Repository (in-memory registry)
    let repository = Arc::new(InMemoryParticipantRepository::new(Arc::new(Mutex::new(
        room,
    ))));

    // 2. Create MessagePusher (WebSocket implementation)
    let message_pusher = Arc::new(WebSocketMessagePusher::new(Arc::new(Mutex::new(
        HashMap::new(),
    ))));

    // 3. Create RoomBroadcaster
    let broadcaster = Arc::new(RoomBroadcaster::new(
        repository.clone(),
        message_pusher.clone(),
    ));

    // 4. Create UseCases
    let connect_participant_usecase = Arc::new(ConnectParticipantUseCase::new(
        repository.clone(),
        message_pusher.clone(),
        broadcaster.clone(),
    ));
    let fetch_others_usecase = Arc::new(FetchOthersUseCase::new(broadcaster.clone()));
    let update_participant_usecase = Arc::new(UpdateParticipantUseCase::new(
        repository.clone(),
        broadcaster.clone(),
    ));
    let disconnect_participant_usecase = Arc::new(DisconnectParticipantUseCase::new(
        repository.clone(),
        message_pusher,
        broadcaster,
    ));
    let get_room_state_usecase = Arc::new(GetRoomStateUseCase::new(repository));

    // 5. Create AppState
    Arc::new(AppState {
        room_id,
        connect_participant_usecase,
        fetch_others_usecase,
        update_participant_usecase,
        disconnect_participant_usecase,
        get_room_state_usecase,
    })
}
