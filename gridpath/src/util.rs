/// Strip every whitespace character, the way input fields are cleaned before parsing
pub fn remove_all_spaces(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}
