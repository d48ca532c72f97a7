use unidux::Action;

pub const INCREMENT: &str = "INCREMENT";
pub const DECREMENT: &str = "DECREMENT";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterAction {
    Increment,
    Decrement,
}

impl Action for CounterAction {
    fn action_type(&self) -> &str {
        match self {
            CounterAction::Increment => INCREMENT,
            CounterAction::Decrement => DECREMENT,
        }
    }
}
