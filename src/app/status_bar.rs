/// Hints shown on either side of the status bar
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusBarState {
    pub left_hint: String,
    pub right_hint: String,
}

impl StatusBarState {
    fn new(left: &str, right: &str) -> Self {
        Self {
            left_hint: left.to_string(),
            right_hint: right.to_string(),
        }
    }

    pub fn upload_normal() -> Self {
        Self::new("i: edit  Tab: text/.docx", "Enter: continue  :help")
    }

    pub fn upload_text_insert() -> Self {
        Self::new("Type or paste the contract", "Esc: normal")
    }

    pub fn path_insert() -> Self {
        Self::new("Type a file path", "Esc: normal  Enter: continue")
    }

    pub fn branding_normal() -> Self {
        Self::new("j/k: fields  i: edit", "Enter: continue  h: back")
    }

    pub fn branding_insert() -> Self {
        Self::new("#RRGGBB or #RGB", "Esc: normal  Tab: next field")
    }

    pub fn preview() -> Self {
        Self::new("Check the summary", "Enter: format  h: back")
    }

    pub fn processing() -> Self {
        Self::new("Formatting contract...", "")
    }

    pub fn processing_failed() -> Self {
        Self::new("Submission failed", "r: start over  :q")
    }

    pub fn result() -> Self {
        Self::new("Documents ready", "d: download  n: new contract")
    }

    pub fn downloading() -> Self {
        Self::new("Downloading...", "")
    }

    pub fn command_mode() -> Self {
        Self::new("", "Enter: run  Esc: cancel")
    }
}
