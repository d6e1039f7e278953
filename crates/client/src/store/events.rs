use api_types::{
    CommentView,
    event::{AttendeeView, EventDetail, EventView},
};

#[derive(Clone, Debug, PartialEq)]
pub struct EventState {
    pub group_events: Vec<EventView>,
    pub current: Option<EventDetail>,
    pub loading: bool,
    pub error: Option<String>,
}

impl Default for EventState {
    fn default() -> Self {
        Self {
            group_events: Vec::new(),
            current: None,
            loading: true,
            error: None,
        }
    }
}

#[derive(Clone, Debug)]
pub enum EventAction {
    GroupEventsLoaded(Vec<EventView>),
    Opened(EventDetail),
    Created(EventView),
    Updated(EventView),
    AttendanceSet(Vec<AttendeeView>),
    Commented(Vec<CommentView>),
    Error(String),
    ClearError,
    SetLoading,
}

impl EventState {
    pub fn reduce(mut self, action: EventAction) -> Self {
        match action {
            EventAction::GroupEventsLoaded(events) => self.group_events = events,
            EventAction::Opened(detail) => self.current = Some(detail),
            EventAction::Created(event) => self.group_events.insert(0, event),
            EventAction::Updated(event) => {
                if let Some(slot) = self.group_events.iter_mut().find(|e| e.id == event.id) {
                    *slot = event.clone();
                }
                self.current = match self.current.take() {
                    Some(detail) if detail.event.id == event.id => Some(EventDetail {
                        event,
                        ..detail
                    }),
                    _ => Some(EventDetail {
                        event,
                        attendees: Vec::new(),
                        comments: Vec::new(),
                    }),
                };
            }
            EventAction::AttendanceSet(attendees) => {
                if let Some(current) = self.current.as_mut() {
                    current.attendees = attendees;
                }
            }
            EventAction::Commented(comments) => {
                if let Some(current) = self.current.as_mut() {
                    current.comments = comments;
                }
            }
            EventAction::Error(error) => self.error = Some(error),
            EventAction::ClearError => {
                self.error = None;
                return self;
            }
            EventAction::SetLoading => {
                self.loading = true;
                return self;
            }
        }
        self.loading = false;
        self
    }
}
