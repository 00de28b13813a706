//! README rendering

/// README committed next to the generated page
pub fn render_readme(brief: &str, pages_url: &str) -> String {
    format!(
        r#"# Task App

## Summary
This project was generated automatically in response to the following brief:

> {brief}

The app is built using HTML, CSS, and JavaScript, and is designed to be minimal, functional, and easy to use.

## Setup
- No installation required.
- Visit the live site at: {pages_url}
- Or, download the repository and open `index.html` in your browser.

## Usage
- Follow the instructions on the web page.
- If the app supports file uploads or URL parameters, use them as described in the brief above.

## Code Explanation
- The main logic is in `index.html`, which contains all HTML, CSS, and JavaScript.
- The code was generated by a large language model from the brief above.
- Attachments (if any) are included in the repository and referenced by the app as needed.

## License
This repository is licensed under the MIT License. See the [LICENSE](LICENSE) file for details.
"#
    )
}
