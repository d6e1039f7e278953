use api_types::group::{GroupView, MemberView};

/// The group being looked at, with its member list once loaded.
#[derive(Clone, Debug, PartialEq)]
pub struct CurrentGroup {
    pub group: GroupView,
    pub members: Vec<MemberView>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GroupState {
    pub groups: Vec<GroupView>,
    pub current: Option<CurrentGroup>,
    pub loading: bool,
    pub error: Option<String>,
}

impl Default for GroupState {
    fn default() -> Self {
        Self {
            groups: Vec::new(),
            current: None,
            loading: true,
            error: None,
        }
    }
}

#[derive(Clone, Debug)]
pub enum GroupAction {
    Loaded(Vec<GroupView>),
    Opened(GroupView),
    Created(GroupView),
    Updated(GroupView),
    /// Member list returned after loading or adding a member.
    MembersSet(Vec<MemberView>),
    MemberRemoved(String),
    Error(String),
    ClearError,
    SetLoading,
}

impl GroupState {
    pub fn reduce(mut self, action: GroupAction) -> Self {
        match action {
            GroupAction::Loaded(groups) => {
                self.groups = groups;
            }
            GroupAction::Opened(group) => {
                let members = match self.current.take() {
                    Some(current) if current.group.id == group.id => current.members,
                    _ => Vec::new(),
                };
                self.current = Some(CurrentGroup { group, members });
            }
            GroupAction::Created(group) => {
                self.groups.insert(0, group);
            }
            GroupAction::Updated(group) => {
                if let Some(slot) = self.groups.iter_mut().find(|g| g.id == group.id) {
                    *slot = group.clone();
                }
                let members = self
                    .current
                    .take()
                    .filter(|c| c.group.id == group.id)
                    .map(|c| c.members)
                    .unwrap_or_default();
                self.current = Some(CurrentGroup { group, members });
            }
            GroupAction::MembersSet(members) => {
                if let Some(current) = self.current.as_mut() {
                    current.members = members;
                }
            }
            GroupAction::MemberRemoved(username) => {
                if let Some(current) = self.current.as_mut() {
                    current.members.retain(|m| m.username != username);
                }
            }
            GroupAction::Error(error) => {
                self.error = Some(error);
            }
            GroupAction::ClearError => {
                self.error = None;
                return self;
            }
            GroupAction::SetLoading => {
                self.loading = true;
                return self;
            }
        }
        self.loading = false;
        self
    }
}
