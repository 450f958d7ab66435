//! The static table of test groups
//!
//! Order matters: groups run, and are reported, in table order.

use xslt_engine_traits::ParseOptions;

/// Which executor handles the cases of a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseHandler {
    /// Stylesheet + companion document, or standalone document
    Xslt,
}

/// Platforms a group is meaningful on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    Everywhere,
    NotWindows,
}

impl Availability {
    pub fn is_available(self) -> bool {
        match self {
            Availability::Everywhere => true,
            Availability::NotWindows => !cfg!(windows),
        }
    }
}

/// One named group of fixtures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TestGroup {
    pub description: &'static str,
    pub handler: CaseHandler,
    /// Directory the fixtures live in, relative to the suite root
    pub directory: Option<&'static str>,
    /// Wildcard pattern selecting the fixtures inside `directory`
    pub pattern: Option<&'static str>,
    pub options: ParseOptions,
    pub availability: Availability,
}

impl TestGroup {
    pub const fn xslt(
        description: &'static str,
        directory: &'static str,
        pattern: &'static str,
        options: ParseOptions,
    ) -> Self {
        Self {
            description,
            handler: CaseHandler::Xslt,
            directory: Some(directory),
            pattern: Some(pattern),
            options,
            availability: Availability::Everywhere,
        }
    }

    const fn not_on_windows(mut self) -> Self {
        self.availability = Availability::NotWindows;
        self
    }
}

const NODICT: ParseOptions = ParseOptions::NODICT;
const DEFAULT: ParseOptions = ParseOptions::NONE;

/// Every group the suite knows about.
pub const TEST_GROUPS: &[TestGroup] = &[
    TestGroup::xslt("REC2 tests", "REC2", "./*.xsl", DEFAULT),
    TestGroup::xslt("REC tests", "REC", "./*.xsl", DEFAULT),
    TestGroup::xslt("REC tests (standalone)", "REC", "./stand*.xml", DEFAULT),
    TestGroup::xslt("REC tests without dictionaries", "REC", "./*.xsl", NODICT),
    TestGroup::xslt(
        "REC tests without dictionaries (standalone)",
        "REC",
        "./stand*.xml",
        NODICT,
    ),
    TestGroup::xslt("general tests", "general", "./*.xsl", DEFAULT),
    TestGroup::xslt("general tests without dictionaries", "general", "./*.xsl", NODICT),
    TestGroup::xslt("encoding tests", "encoding", "./*.xsl", DEFAULT),
    TestGroup::xslt("documents tests", "documents", "./*.xsl", DEFAULT),
    TestGroup::xslt("numbers tests", "numbers", "./*.xsl", DEFAULT),
    TestGroup::xslt("keys tests", "keys", "./*.xsl", DEFAULT),
    TestGroup::xslt("namespaces tests", "namespaces", "./*.xsl", DEFAULT),
    TestGroup::xslt("extensions tests", "extensions", "./*.xsl", DEFAULT),
    TestGroup::xslt("reports tests", "reports", "./*.xsl", DEFAULT),
    TestGroup::xslt("exslt common tests", "exslt/common", "./*.xsl", DEFAULT),
    TestGroup::xslt("exslt crypto tests", "exslt/crypto", "./*.xsl", DEFAULT).not_on_windows(),
    TestGroup::xslt("exslt date tests", "exslt/date", "./*.xsl", DEFAULT),
    TestGroup::xslt("exslt dynamic tests", "exslt/dynamic", "./*.xsl", DEFAULT),
    TestGroup::xslt("exslt functions tests", "exslt/functions", "./*.xsl", DEFAULT),
    TestGroup::xslt("exslt math tests", "exslt/math", "./*.xsl", DEFAULT),
    TestGroup::xslt("exslt saxon tests", "exslt/saxon", "./*.xsl", DEFAULT),
    TestGroup::xslt("exslt sets tests", "exslt/sets", "./*.xsl", DEFAULT),
    TestGroup::xslt("exslt strings tests", "exslt/strings", "./*.xsl", DEFAULT),
];

/// The groups available on this platform, in table order.
pub fn builtin_groups() -> Vec<TestGroup> {
    TEST_GROUPS
        .iter()
        .copied()
        .filter(|group| group.availability.is_available())
        .collect()
}

/// Pick the groups to run for the given positional filters.
///
/// No filters selects everything. Otherwise each filter, in order, selects
/// the groups whose description equals it, or failing that every group
/// whose description contains it. A filter matching nothing selects nothing.
pub fn select_groups<'a>(groups: &'a [TestGroup], filters: &[String]) -> Vec<&'a TestGroup> {
    if filters.is_empty() {
        return groups.iter().collect();
    }

    let mut selected = Vec::new();
    for filter in filters {
        let exact: Vec<&TestGroup> = groups
            .iter()
            .filter(|group| group.description == filter.as_str())
            .collect();
        if exact.is_empty() {
            selected.extend(
                groups
                    .iter()
                    .filter(|group| group.description.contains(filter.as_str())),
            );
        } else {
            selected.extend(exact);
        }
    }
    selected
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptions(groups: Vec<&TestGroup>) -> Vec<&'static str> {
        groups.into_iter().map(|g| g.description).collect()
    }

    #[test]
    fn no_filter_selects_everything_in_order() {
        let groups = builtin_groups();
        let selected = select_groups(&groups, &[]);
        assert_eq!(selected.len(), groups.len());
        assert_eq!(selected[0].description, "REC2 tests");
    }

    #[test]
    fn exact_description_selects_one_group() {
        let groups = builtin_groups();
        let selected = select_groups(&groups, &["REC tests".to_string()]);
        assert_eq!(descriptions(selected), vec!["REC tests"]);
    }

    #[test]
    fn substring_selects_every_containing_group() {
        let groups = builtin_groups();
        let selected = select_groups(&groups, &["standalone".to_string()]);
        assert_eq!(
            descriptions(selected),
            vec![
                "REC tests (standalone)",
                "REC tests without dictionaries (standalone)"
            ]
        );
    }

    #[test]
    fn unmatched_filter_selects_nothing() {
        let groups = builtin_groups();
        assert!(select_groups(&groups, &["no such group".to_string()]).is_empty());
    }

    #[test]
    fn filters_apply_in_argument_order() {
        let groups = builtin_groups();
        let selected = select_groups(&groups, &["keys".to_string(), "numbers".to_string()]);
        assert_eq!(descriptions(selected), vec!["keys tests", "numbers tests"]);
    }

    #[test]
    fn standalone_groups_use_their_own_pattern() {
        let stand: Vec<_> = TEST_GROUPS
            .iter()
            .filter(|g| g.pattern == Some("./stand*.xml"))
            .collect();
        assert_eq!(stand.len(), 2);
        assert!(stand.iter().all(|g| g.directory == Some("REC")));
        assert!(stand[1].options.contains(ParseOptions::NODICT));
    }
}
