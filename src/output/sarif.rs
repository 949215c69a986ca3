use crate::issue::{Issue, Location as IssueLocation, Severity, ValidationResult};
use serde_sarif::sarif::{
    ArtifactLocation, Location, Message, MultiformatMessageString, PhysicalLocation, Region,
    ReportingDescriptor, Result as SarifResult, ResultLevel, Run, Sarif, Tool, ToolComponent,
};
use std::collections::HashMap;

pub fn format(results: &[ValidationResult]) -> String {
    let all_issues: Vec<(&ValidationResult, &Issue)> = results
        .iter()
        .flat_map(|r| r.issues.iter().map(move |i| (r, i)))
        .collect();

    // Collect unique rules
    let mut rule_map: HashMap<&str, &Issue> = HashMap::new();
    for (_, issue) in &all_issues {
        rule_map.entry(issue.rule_id.as_str()).or_insert(issue);
    }

    let mut rule_ids: Vec<&str> = rule_map.keys().copied().collect();
    rule_ids.sort();

    let rule_index: HashMap<&str, i64> = rule_ids
        .iter()
        .enumerate()
        .map(|(i, id)| (*id, i as i64))
        .collect();

    let rules: Vec<ReportingDescriptor> = rule_ids
        .iter()
        .map(|id| {
            let issue = rule_map[id];
            let mut rule = ReportingDescriptor::builder().id(id.to_string()).build();
            rule.short_description = Some(
                MultiformatMessageString::builder()
                    .text(issue.message.clone())
                    .build(),
            );
            if let Some(ref suggestion) = issue.suggestion {
                rule.help = Some(
                    MultiformatMessageString::builder()
                        .text(suggestion.clone())
                        .build(),
                );
            }
            rule
        })
        .collect();

    let sarif_results: Vec<SarifResult> = all_issues
        .iter()
        .map(|(doc_result, issue)| {
            let level = match issue.severity {
                Severity::Error => ResultLevel::Error,
                Severity::Warn => ResultLevel::Warning,
            };

            let mut result = SarifResult::builder()
                .message(Message::builder().text(issue.message.clone()).build())
                .build();

            result.rule_id = Some(issue.rule_id.clone());
            result.level = Some(level);
            result.rule_index = rule_index.get(issue.rule_id.as_str()).copied();

            let uri = doc_result.path.to_string_lossy().replace('\\', "/");

            let mut location = Location::builder().build();
            let mut physical = PhysicalLocation::builder().build();

            physical.artifact_location = Some(ArtifactLocation::builder().uri(uri).build());

            if let IssueLocation::Block {
                line: Some(line), ..
            } = issue.location
            {
                physical.region = Some(Region::builder().start_line(line as i64).build());
            }

            location.physical_location = Some(physical);
            result.locations = Some(vec![location]);

            result
        })
        .collect();

    let driver = ToolComponent::builder()
        .name("skillcheck")
        .version(env!("CARGO_PKG_VERSION").to_string())
        .rules(rules)
        .build();

    let tool = Tool::builder().driver(driver).build();

    let run = Run::builder().tool(tool).results(sarif_results).build();

    let sarif = Sarif::builder().version("2.1.0").runs(vec![run]).build();

    serde_json::to_string_pretty(&sarif).expect("SARIF serialization failed")
}
