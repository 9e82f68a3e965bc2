//! Built-in portfolio commands.

use anyhow::{Result, anyhow, bail};

use super::{CommandContext, CommandOutput, CommandRegistry};
use crate::segment::{FormattedOutput, SegmentColor, TextSegment};

/// Width of the name column in tabular listings.
const NAME_COLUMN: usize = 12;

pub(super) fn register_all(registry: &mut CommandRegistry) {
    registry
        .register("help", "List available commands", help)
        .register("about", "Who I am", about)
        .register("email", "How to reach me", email)
        .register("social", "Where to find me online", social)
        .register("projects", "Things I have built", projects)
        .register("stack", "Technologies I work with", stack)
        .register("blog", "Read my blog", |ctx, _| {
            media_link(ctx.content.media().blog.as_deref(), "blog", "Read my writing at ")
        })
        .register("videos", "Watch my videos", |ctx, _| {
            media_link(ctx.content.media().videos.as_deref(), "videos", "Watch my talks at ")
        })
        .register("podcasts", "Listen to podcasts I appeared on", |ctx, _| {
            media_link(
                ctx.content.media().podcasts.as_deref(),
                "podcasts",
                "Listen to my episodes at ",
            )
        })
        .register("resume", "Download my resume", resume)
        .register("history", "Show command history", history)
        .register("sudo", "Run a command as administrator", sudo);
}

fn header(title: &str) -> TextSegment {
    TextSegment::colored(title, SegmentColor::Primary).bold()
}

fn name_cell(name: &str, color: SegmentColor) -> TextSegment {
    TextSegment::colored(format!("  {name:<width$}", width = NAME_COLUMN), color).bold()
}

fn help(ctx: &CommandContext<'_>, args: &[String]) -> Result<CommandOutput> {
    if let Some(topic) = args.first() {
        let topic = topic.to_lowercase();
        let info = ctx
            .commands
            .iter()
            .find(|info| info.name == topic)
            .ok_or_else(|| anyhow!("no help entry for '{topic}'"))?;
        let output = FormattedOutput::new()
            .with(TextSegment::colored(info.name, SegmentColor::Accent).bold())
            .with(TextSegment::plain(format!(" - {}", info.description)));
        return Ok(CommandOutput::ok(output));
    }

    let mut output = FormattedOutput::new().with(header("AVAILABLE COMMANDS"));
    for info in ctx.commands {
        output = output
            .newline()
            .with(name_cell(info.name, SegmentColor::Accent))
            .with(TextSegment::plain(info.description));
    }
    output = output.newline().newline().with(TextSegment::colored(
        "Use ↑/↓ to browse previous commands.",
        SegmentColor::Muted,
    ));
    Ok(CommandOutput::ok(output))
}

fn about(ctx: &CommandContext<'_>, _args: &[String]) -> Result<CommandOutput> {
    let profile = ctx.content.profile();
    let mut output = FormattedOutput::new()
        .with(header("ABOUT ME"))
        .newline()
        .with(TextSegment::colored("Name:     ", SegmentColor::Muted))
        .with(TextSegment::colored(&profile.name, SegmentColor::Accent).bold());
    if !profile.location.is_empty() {
        output = output
            .newline()
            .with(TextSegment::colored("Location: ", SegmentColor::Muted))
            .with(TextSegment::plain(&profile.location));
    }
    output = output
        .newline()
        .newline()
        .with(TextSegment::plain(&profile.bio));
    if !profile.skills.is_empty() {
        output = output
            .newline()
            .newline()
            .with(TextSegment::colored("Skills:   ", SegmentColor::Muted))
            .with(TextSegment::colored(
                profile.skills.join(", "),
                SegmentColor::Secondary,
            ));
    }
    Ok(CommandOutput::ok(output))
}

fn email(ctx: &CommandContext<'_>, _args: &[String]) -> Result<CommandOutput> {
    let address = &ctx.content.profile().email;
    if address.is_empty() {
        bail!("no email address is configured");
    }
    let output = FormattedOutput::new()
        .with(TextSegment::plain("Reach me at "))
        .with(
            TextSegment::colored(address, SegmentColor::Secondary)
                .with_url(format!("mailto:{address}")),
        );
    Ok(CommandOutput::ok(output))
}

fn social(ctx: &CommandContext<'_>, _args: &[String]) -> Result<CommandOutput> {
    let mut output = FormattedOutput::new().with(header("SOCIAL LINKS"));
    for link in ctx.content.social_links() {
        output = output
            .newline()
            .with(name_cell(&link.platform, SegmentColor::Accent))
            .with(TextSegment::link(&link.url));
    }
    Ok(CommandOutput::ok(output))
}

fn projects(ctx: &CommandContext<'_>, _args: &[String]) -> Result<CommandOutput> {
    let mut output = FormattedOutput::new().with(header("MY PROJECTS"));
    for project in ctx.content.projects() {
        output = output
            .newline()
            .newline()
            .with(TextSegment::colored("  ▸ ", SegmentColor::Muted))
            .with(TextSegment::colored(&project.name, SegmentColor::Accent).bold())
            .newline()
            .with(TextSegment::plain(format!("    {}", project.description)))
            .newline()
            .with(TextSegment::plain("    "))
            .with(TextSegment::link(&project.url));
    }
    Ok(CommandOutput::ok(output))
}

fn stack(ctx: &CommandContext<'_>, _args: &[String]) -> Result<CommandOutput> {
    let mut output = FormattedOutput::new().with(header("TECH STACK"));
    for category in ctx.content.stack() {
        output = output
            .newline()
            .with(name_cell(&category.category, SegmentColor::Warning))
            .with(TextSegment::plain(category.technologies.join(" · ")));
    }
    Ok(CommandOutput::ok(output))
}

fn media_link(url: Option<&str>, what: &str, lead: &str) -> Result<CommandOutput> {
    let url = url.ok_or_else(|| anyhow!("no {what} link is configured"))?;
    let output = FormattedOutput::new()
        .with(TextSegment::plain(lead))
        .with(TextSegment::link(url));
    Ok(CommandOutput::ok(output))
}

fn resume(ctx: &CommandContext<'_>, _args: &[String]) -> Result<CommandOutput> {
    let url = ctx
        .content
        .resume_url()
        .ok_or_else(|| anyhow!("no resume link is configured"))?;
    let output = FormattedOutput::new()
        .with(TextSegment::plain("Grab a copy of my resume: "))
        .with(TextSegment::link(url));
    Ok(CommandOutput::ok(output))
}

fn history(ctx: &CommandContext<'_>, _args: &[String]) -> Result<CommandOutput> {
    if ctx.history.is_empty() {
        return Ok(CommandOutput::ok("No commands in history."));
    }
    let width = ctx.history.len().to_string().len();
    let mut text = ctx
        .history
        .iter()
        .enumerate()
        .map(|(idx, entry)| format!("  {:>width$}  {entry}", idx + 1))
        .collect::<Vec<_>>()
        .join("\n");
    text.push('\n');
    Ok(CommandOutput::ok(text))
}

fn sudo(_ctx: &CommandContext<'_>, _args: &[String]) -> Result<CommandOutput> {
    const TRANSCRIPT: &str = "\
[sudo] password for guest: ********
Hit:1 https://packages.portfolio.dev stable InRelease
Get:2 https://packages.portfolio.dev stable/main curiosity 4.2.0 [512 kB]
Get:3 https://packages.portfolio.dev stable/main side-projects 9.1.3 [2,048 kB]
Fetched 2,560 kB in 1s (2,560 kB/s)
Reading package lists... Done
Building dependency tree... Done
The following packages will be upgraded:
  curiosity side-projects
2 upgraded, 0 newly installed, 0 to remove and 0 not upgraded.
Setting up curiosity (4.2.0) ...
Setting up side-projects (9.1.3) ...
Nice try. This terminal is read-only, but the upgrade is noted.";
    Ok(CommandOutput::ok(TRANSCRIPT))
}
