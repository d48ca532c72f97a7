use anyhow::bail;
use std::fmt;
use std::str::FromStr;

/// Slice key of the todo list
pub const TODOS: &str = "todos";

/// Slice key of the visibility filter
pub const VISIBILITY_FILTER: &str = "visibility_filter";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TodoId(pub u64);

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Todo {
    pub id: TodoId,
    pub text: String,
    pub completed: bool,
}

/// Which todos the list shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VisibilityFilter {
    #[default]
    ShowAll,
    ShowCompleted,
    ShowActive,
}

impl VisibilityFilter {
    pub const ALL: [VisibilityFilter; 3] = [
        VisibilityFilter::ShowAll,
        VisibilityFilter::ShowActive,
        VisibilityFilter::ShowCompleted,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VisibilityFilter::ShowAll => "SHOW_ALL",
            VisibilityFilter::ShowCompleted => "SHOW_COMPLETED",
            VisibilityFilter::ShowActive => "SHOW_ACTIVE",
        }
    }

    /// Label shown in the footer
    pub fn label(&self) -> &'static str {
        match self {
            VisibilityFilter::ShowAll => "All",
            VisibilityFilter::ShowCompleted => "Completed",
            VisibilityFilter::ShowActive => "Active",
        }
    }

    /// Next filter in footer order, wrapping around
    pub fn next(&self) -> Self {
        let index = Self::ALL.iter().position(|f| f == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }

    pub fn matches(&self, todo: &Todo) -> bool {
        match self {
            VisibilityFilter::ShowAll => true,
            VisibilityFilter::ShowCompleted => todo.completed,
            VisibilityFilter::ShowActive => !todo.completed,
        }
    }
}

impl FromStr for VisibilityFilter {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SHOW_ALL" => Ok(VisibilityFilter::ShowAll),
            "SHOW_COMPLETED" => Ok(VisibilityFilter::ShowCompleted),
            "SHOW_ACTIVE" => Ok(VisibilityFilter::ShowActive),
            _ => bail!("Unknown filter: {}", s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_parse() {
        assert_eq!(
            "SHOW_ACTIVE".parse::<VisibilityFilter>().unwrap(),
            VisibilityFilter::ShowActive
        );
        assert!("show_all".parse::<VisibilityFilter>().is_err());
        for filter in VisibilityFilter::ALL {
            assert_eq!(filter.as_str().parse::<VisibilityFilter>().unwrap(), filter);
        }
    }

    #[test]
    fn test_filter_cycle() {
        let mut filter = VisibilityFilter::ShowAll;
        filter = filter.next();
        assert_eq!(filter, VisibilityFilter::ShowActive);
        filter = filter.next();
        assert_eq!(filter, VisibilityFilter::ShowCompleted);
        assert_eq!(filter.next(), VisibilityFilter::ShowAll);
    }
}
