use crate::{
    cli::globals::GlobalArgs,
    shell::{Section, Shell, View},
};
use anyhow::Result;

const fn section_title(section: Section) -> &'static str {
    match section {
        Section::Hero => "Xuper",
        Section::Downloads => "Downloads",
        Section::Features => "Features",
        Section::SocialProof => "What people say",
        Section::ClosingCta => "Sign up to download",
    }
}

/// Prints who is signed in and which sections the current view shows.
pub fn print_view(shell: &Shell) {
    match shell.display_name() {
        Some(name) => println!("Signed in as {name}"),
        None => println!("Not signed in"),
    }

    match shell.view() {
        View::Admin => println!("View: admin dashboard (run `xuper users`)"),
        view @ View::Landing { .. } => {
            let sections: Vec<&str> = view.sections().into_iter().map(section_title).collect();
            println!("View: {}", sections.join(" | "));
        }
    }
}

/// # Errors
/// Does not fail; the store repairs unreadable state on load.
pub fn execute(globals: &GlobalArgs) -> Result<()> {
    let shell = Shell::init(globals.store());
    print_view(&shell);
    Ok(())
}
