use tagwatch::core::TagwatchResult;
use tagwatch::di::ServiceContainer;
use tagwatch::github::RepoRef;
use tagwatch::status::TagStatus;

pub async fn run(repo: String, json: bool) -> TagwatchResult<()> {
    let repo: RepoRef = repo.parse()?;

    let container = ServiceContainer::new()?;
    let service = container.status_service();
    let status = service.status(&repo).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("{}", render(&status, &container.config.github.web_url));
    }

    // Stale answers kick off a refresh; let it land before exiting
    service.wait_for_revalidations().await;

    Ok(())
}

fn render(status: &TagStatus, web_url: &str) -> String {
    let mut out = String::new();

    match status.latest_tag {
        None => {
            out.push_str(&format!("{}: no tags", status.repo));
            return out;
        }
        Some(ref tag) if status.is_up_to_date => {
            out.push_str(&format!(
                "✓ {}: {} is up to date with {}",
                status.repo,
                tag,
                branch_label(status)
            ));
        }
        Some(ref tag) => {
            out.push_str(&format!(
                "⚠️  {}: {} is ahead of {}",
                status.repo,
                branch_label(status),
                tag
            ));
            if let Some(ref n) = status.ahead_by {
                out.push_str(&format!(" by {} commit(s)", n));
            }
        }
    }

    if let Some(link) = status.link_url(web_url) {
        out.push_str(&format!("\n  {}", link));
    }

    out
}

fn branch_label(status: &TagStatus) -> &str {
    if status.default_branch.is_empty() {
        "the default branch"
    } else {
        &status.default_branch
    }
}
