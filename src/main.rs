//! # photo-groups CLI
//!
//! Command-line interface for the family photo grouper.
//!
//! ## Usage
//! ```bash
//! photo-groups group ~/Photos/family --manifest faces.json
//! photo-groups group a.jpg b.jpg fam.jpg --analyzer-command ./deepface.sh --output json
//! photo-groups serve --port 5000 --analyzer-command ./deepface.sh
//! ```

mod cli;

use family_photo_grouper::Result;

fn main() -> Result<()> {
    cli::run()
}
