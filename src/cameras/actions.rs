//! Repair actions list of a report, kept in the order they were entered.

/// Append a trimmed action. `None` when nothing is left after trimming.
pub fn add_action(actions: &[String], text: &str) -> Option<Vec<String>> {
    let action = text.trim();
    if action.is_empty() {
        return None;
    }
    let mut next = actions.to_vec();
    next.push(action.to_string());
    Some(next)
}

/// Remove the action at `index`; an out-of-range index leaves the list alone.
pub fn remove_action(actions: &[String], index: usize) -> Vec<String> {
    let mut next = actions.to_vec();
    if index < next.len() {
        next.remove(index);
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_add_action_trims_and_appends() {
        let actions = add_action(&[], "  Cleaned curtains ").unwrap();
        let actions = add_action(&actions, "Lubricated escapement").unwrap();
        assert_eq!(actions, list(&["Cleaned curtains", "Lubricated escapement"]));
    }

    #[test]
    fn test_add_blank_action_rejected() {
        let actions = list(&["Cleaned curtains"]);
        assert_eq!(add_action(&actions, ""), None);
        assert_eq!(add_action(&actions, " \t "), None);
    }

    #[test]
    fn test_remove_action_by_index() {
        let actions = list(&["a", "b", "c"]);
        assert_eq!(remove_action(&actions, 1), list(&["a", "c"]));
        assert_eq!(remove_action(&actions, 3), actions);
        assert!(remove_action(&[], 0).is_empty());
    }
}
