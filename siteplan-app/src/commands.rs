use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use siteplan_config::{AppConfig, RenderSettings};
use siteplan_engine::ZoningRegistry;
use siteplan_io::{
    ArtifactSaver, FileArtifactSaver, SurveyFacade, SurveyLoader, ValidationMode,
    validate_boundary,
};
use siteplan_render::render_site_plan;
use tracing::info;

#[derive(Debug, Args)]
pub struct RenderArgs {
    /// 测量文档路径
    pub survey: PathBuf,
    /// 覆盖文档中的城市
    #[arg(long)]
    pub city: Option<String>,
    /// 输出文件（.png / .txt / .b64 / .html）；缺省时将 Base64 打印到标准输出
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// 任一边界记录非法即拒绝整个文档
    #[arg(long)]
    pub strict: bool,
    #[arg(long)]
    pub scale: Option<f64>,
    #[arg(long)]
    pub ppi: Option<f64>,
    #[arg(long)]
    pub margin: Option<u32>,
}

impl RenderArgs {
    fn settings(&self, base: RenderSettings) -> RenderSettings {
        RenderSettings {
            scale: self.scale.unwrap_or(base.scale),
            ppi: self.ppi.unwrap_or(base.ppi),
            margin: self.margin.unwrap_or(base.margin),
        }
    }

    fn mode(&self) -> ValidationMode {
        if self.strict {
            ValidationMode::Strict
        } else {
            ValidationMode::Lenient
        }
    }
}

pub fn render(config: &AppConfig, args: &RenderArgs) -> Result<()> {
    let registry = ZoningRegistry::from_config(&config.zoning).context("invalid zoning table")?;

    let document = SurveyFacade::new()
        .load(&args.survey)
        .with_context(|| format!("cannot load survey {}", args.survey.display()))?;
    let validated = validate_boundary(&document.boundary, args.mode())?;
    for rejected in &validated.rejected {
        eprintln!(
            "warning: dropped boundary point #{}: {}",
            rejected.index, rejected.defect
        );
    }

    let city = args.city.as_deref().unwrap_or(&document.city.name);
    let rendered = render_site_plan(
        &registry,
        args.settings(config.render),
        &validated.segments,
        city,
    )?;
    for diagnostic in &rendered.diagnostics {
        eprintln!("warning: {diagnostic}");
    }

    match &args.output {
        Some(path) => {
            let format = FileArtifactSaver::new().save(&rendered, &document, path)?;
            info!(path = %path.display(), ?format, "输出完成");
        }
        None => println!("{}", rendered.encoded),
    }
    Ok(())
}

pub fn list_cities(config: &AppConfig) -> Result<()> {
    let registry = ZoningRegistry::from_config(&config.zoning).context("invalid zoning table")?;
    let zonings = registry
        .cities()
        .chain(std::iter::once(registry.default_zoning()));
    for zoning in zonings {
        println!("{}", zoning.name());
        for (direction, rule) in zoning.rules() {
            println!(
                "  {direction}: setback {}ft, landscape easement {}ft, utility easement {}ft",
                rule.setback_landscape, rule.easement_landscape, rule.easement_utility
            );
        }
    }
    Ok(())
}
