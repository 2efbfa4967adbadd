use std::fmt;

/// The view an appointment slot is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    Empty,
    Show,
    Create,
    Edit,
    Saving,
    Confirm,
    Deleting,
    ErrorSave,
    ErrorDelete,
}

/// A user gesture on a slot: one per rendered control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Add,
    Edit,
    Delete,
    EnterStudent,
    SelectInterviewer,
    Save,
    Cancel,
    Confirm,
    Close,
}

impl Mode {
    /// Starting mode for a freshly mounted slot
    pub fn initial(booked: bool) -> Self {
        if booked {
            Mode::Show
        } else {
            Mode::Empty
        }
    }

    /// A remote call is in flight; nothing is clickable
    pub fn is_busy(self) -> bool {
        matches!(self, Mode::Saving | Mode::Deleting)
    }

    pub fn shows_form(self) -> bool {
        matches!(self, Mode::Create | Mode::Edit)
    }

    /// Controls rendered in this mode. Anything else is not clickable.
    pub fn controls(self) -> &'static [Action] {
        match self {
            Mode::Empty => &[Action::Add],
            Mode::Show => &[Action::Edit, Action::Delete],
            Mode::Create | Mode::Edit => &[
                Action::EnterStudent,
                Action::SelectInterviewer,
                Action::Save,
                Action::Cancel,
            ],
            Mode::Confirm => &[Action::Cancel, Action::Confirm],
            Mode::ErrorSave | Mode::ErrorDelete => &[Action::Close],
            Mode::Saving | Mode::Deleting => &[],
        }
    }

    pub fn allows(self, action: Action) -> bool {
        self.controls().contains(&action)
    }

    pub fn name(self) -> &'static str {
        match self {
            Mode::Empty => "EMPTY",
            Mode::Show => "SHOW",
            Mode::Create => "CREATE",
            Mode::Edit => "EDIT",
            Mode::Saving => "SAVING",
            Mode::Confirm => "CONFIRM",
            Mode::Deleting => "DELETING",
            Mode::ErrorSave => "ERROR_SAVE",
            Mode::ErrorDelete => "ERROR_DELETE",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Action {
    /// Text or alt text of the control
    pub fn label(self) -> &'static str {
        match self {
            Action::Add => "Add",
            Action::Edit => "Edit",
            Action::Delete => "Delete",
            Action::EnterStudent => "Enter Student Name",
            Action::SelectInterviewer => "Interviewer",
            Action::Save => "Save",
            Action::Cancel => "Cancel",
            Action::Confirm => "Confirm",
            Action::Close => "Close",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
