use api_types::{CommentView, drink::DrinkView};
use uuid::Uuid;

/// A listed drink with the comment thread loaded for it so far.
#[derive(Clone, Debug, PartialEq)]
pub struct DrinkEntry {
    pub drink: DrinkView,
    pub comments: Vec<CommentView>,
}

impl From<DrinkView> for DrinkEntry {
    fn from(drink: DrinkView) -> Self {
        Self {
            drink,
            comments: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct DrinkState {
    /// Drinks of the signed-in user.
    pub drinks: Vec<DrinkEntry>,
    pub group_drinks: Vec<DrinkEntry>,
    pub event_drinks: Vec<DrinkEntry>,
    pub loading: bool,
    pub error: Option<String>,
}

impl Default for DrinkState {
    fn default() -> Self {
        Self {
            drinks: Vec::new(),
            group_drinks: Vec::new(),
            event_drinks: Vec::new(),
            loading: true,
            error: None,
        }
    }
}

#[derive(Clone, Debug)]
pub enum DrinkAction {
    UserDrinksLoaded(Vec<DrinkView>),
    GroupDrinksLoaded(Vec<DrinkView>),
    EventDrinksLoaded(Vec<DrinkView>),
    Added(DrinkView),
    /// Full thread of a drink after a new comment.
    Commented {
        drink_id: Uuid,
        comments: Vec<CommentView>,
    },
    Error(String),
    ClearError,
    SetLoading,
}

fn entries(drinks: Vec<DrinkView>) -> Vec<DrinkEntry> {
    drinks.into_iter().map(DrinkEntry::from).collect()
}

fn replace_thread(list: &mut [DrinkEntry], drink_id: Uuid, comments: &[CommentView]) {
    for entry in list.iter_mut().filter(|e| e.drink.id == drink_id) {
        entry.comments = comments.to_vec();
    }
}

impl DrinkState {
    pub fn reduce(mut self, action: DrinkAction) -> Self {
        match action {
            DrinkAction::UserDrinksLoaded(drinks) => self.drinks = entries(drinks),
            DrinkAction::GroupDrinksLoaded(drinks) => self.group_drinks = entries(drinks),
            DrinkAction::EventDrinksLoaded(drinks) => self.event_drinks = entries(drinks),
            DrinkAction::Added(drink) => {
                self.drinks.insert(0, DrinkEntry::from(drink.clone()));
                self.group_drinks.insert(0, DrinkEntry::from(drink));
            }
            DrinkAction::Commented { drink_id, comments } => {
                replace_thread(&mut self.drinks, drink_id, &comments);
                replace_thread(&mut self.group_drinks, drink_id, &comments);
            }
            DrinkAction::Error(error) => self.error = Some(error),
            DrinkAction::ClearError => {
                self.error = None;
                return self;
            }
            DrinkAction::SetLoading => {
                self.loading = true;
                return self;
            }
        }
        self.loading = false;
        self
    }
}
