//! Post-sign-up pages: profile, birthdate, invites, approved domains, dashboard

use onboard_common::Candidates;

fn submit(control: &str) -> Candidates {
    Candidates::new(control).css("button[type='submit']")
}

pub mod profile {
    use super::*;

    pub fn avatar_input() -> Candidates {
        Candidates::new("avatar input").css("input[type='file']")
    }

    pub fn first_name() -> Candidates {
        Candidates::new("first name").css("input[name='firstName']")
    }

    pub fn last_name() -> Candidates {
        Candidates::new("last name").css("input[name='lastName']")
    }

    pub fn continue_button() -> Candidates {
        submit("profile continue button")
    }
}

pub mod birthdate {
    use super::*;

    pub fn day() -> Candidates {
        Candidates::new("birth day").css("select[name='day']")
    }

    pub fn month() -> Candidates {
        Candidates::new("birth month").css("select[name='month']")
    }

    pub fn year() -> Candidates {
        Candidates::new("birth year").css("select[name='year']")
    }

    pub fn continue_button() -> Candidates {
        submit("birthdate continue button")
    }
}

pub mod invite {
    use super::*;

    pub fn emails() -> Candidates {
        Candidates::new("invite emails").css("textarea[name='emails']")
    }

    pub fn copy_link() -> Candidates {
        Candidates::new("copy invite link").css("[data-testid='copy-link']")
    }

    pub fn invite_later() -> Candidates {
        Candidates::new("invite later").css("[data-testid='invite-later']")
    }
}

pub mod domains {
    use super::*;

    pub fn skip() -> Candidates {
        Candidates::new("approved domains skip").css("[data-testid='skip']")
    }
}

pub mod dashboard {
    use super::*;

    pub fn profile_name() -> Candidates {
        Candidates::new("profile name").css("[data-testid='profile-name']")
    }

    pub fn profile_email() -> Candidates {
        Candidates::new("profile email").css("[data-testid='profile-email']")
    }
}
