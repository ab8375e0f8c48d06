//! Renders findings as text for the user prompt.

use partitioner_api::devicegraph::Finding;

/// Builds the error report shown when the setup cannot be used.
pub fn error_report(findings: &[Finding]) -> String {
    let mut report = String::from("The storage setup cannot be used:\n\n");
    report += &bullet_list(descriptions(findings));
    report += "\nFix these issues before continuing.";
    report
}

/// Builds the question asking the user to accept a questionable setup.
pub fn advisory_question(findings: &[Finding]) -> String {
    let mut question = String::from("The storage setup has some issues:\n\n");
    question += &bullet_list(descriptions(findings));
    question += "\nContinue anyway?";
    question
}

/// Builds the question asking the user to install missing packages.
pub fn install_question(packages: &[String]) -> String {
    let mut question =
        String::from("The storage setup needs these packages, which are not installed:\n\n");
    question += &bullet_list(packages.iter().map(String::as_str));
    question += "\nInstall them now?";
    question
}

fn descriptions(findings: &[Finding]) -> impl Iterator<Item = &str> {
    findings.iter().map(|finding| finding.description.as_str())
}

fn bullet_list<'a>(lines: impl Iterator<Item = &'a str>) -> String {
    lines.map(|line| format!("  - {line}\n")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use indoc::indoc;

    #[test]
    fn test_error_report() {
        let findings = vec![
            Finding::fatal("There is no device mounted at '/'"),
            Finding::advisory("There is no swap device"),
        ];
        assert_eq!(
            error_report(&findings),
            indoc! {"
                The storage setup cannot be used:

                  - There is no device mounted at '/'
                  - There is no swap device

                Fix these issues before continuing."}
        );
    }

    #[test]
    fn test_advisory_question() {
        assert_eq!(
            advisory_question(&[Finding::advisory("There is no swap device")]),
            indoc! {"
                The storage setup has some issues:

                  - There is no swap device

                Continue anyway?"}
        );
    }

    #[test]
    fn test_install_question() {
        assert_eq!(
            install_question(&["lvm2".into(), "mdadm".into()]),
            indoc! {"
                The storage setup needs these packages, which are not installed:

                  - lvm2
                  - mdadm

                Install them now?"}
        );
    }
}
