//! Session state.

use xmcam_protocol::FrameHeader;

/// Role of a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Logs in and owns the session.
    Primary,
    /// Reuses the session identifier of a primary connection.
    Sub,
}

/// Session lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No transport, or the transport was closed.
    Disconnected,
    /// Transport open, not logged in.
    Connected,
    /// Login request in flight.
    Authenticating,
    /// Session identifier assigned (or inherited, for sub-connections).
    Authenticated,
}

/// Session identity and sequence tracking for one connection.
#[derive(Debug, Clone)]
pub struct Session {
    role: Role,
    state: SessionState,
    session_id: u32,
    sequence: i32,
    parent_session_id: Option<u32>,
    closed: bool,
}

impl Session {
    /// Creates a primary session, not yet connected.
    pub fn new() -> Self {
        Self {
            role: Role::Primary,
            state: SessionState::Disconnected,
            session_id: 0,
            sequence: 0,
            parent_session_id: None,
            closed: false,
        }
    }

    /// Creates a sub-connection session bound to a copy of the parent's identifier.
    pub fn bound_to(parent_session_id: u32) -> Self {
        Self {
            role: Role::Sub,
            state: SessionState::Disconnected,
            session_id: parent_session_id,
            sequence: 0,
            parent_session_id: Some(parent_session_id),
            closed: false,
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn session_id(&self) -> u32 {
        self.session_id
    }

    /// Sequence number of the most recent reply.
    pub fn sequence(&self) -> i32 {
        self.sequence
    }

    /// Session identifier copied from the parent, for sub-connections.
    pub fn parent_session_id(&self) -> Option<u32> {
        self.parent_session_id
    }

    pub fn is_authenticated(&self) -> bool {
        self.state == SessionState::Authenticated
    }

    /// Whether the session was ever closed. A closed session never reconnects.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Transport opened. Sub-connections are usable right away.
    pub fn on_connected(&mut self) {
        self.state = match self.role {
            Role::Primary => SessionState::Connected,
            Role::Sub => SessionState::Authenticated,
        };
    }

    /// Login request about to be sent.
    pub fn on_login_started(&mut self) {
        self.state = SessionState::Authenticating;
    }

    /// Login accepted; the identifier is assigned once.
    pub fn on_login_accepted(&mut self, session_id: u32) {
        self.session_id = session_id;
        self.state = SessionState::Authenticated;
    }

    /// Login rejected or failed; the session stays unauthenticated.
    pub fn on_login_failed(&mut self) {
        if self.state == SessionState::Authenticating {
            self.state = SessionState::Connected;
        }
    }

    /// Records the header of a reply received on this session's connection.
    pub fn record_reply(&mut self, header: &FrameHeader) {
        self.sequence = header.sequence;
    }

    pub fn on_disconnected(&mut self) {
        self.state = SessionState::Disconnected;
        self.closed = true;
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
