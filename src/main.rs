//! Vitrina - 图书馆虚拟展览前端核心
//!
//! 控制台驱动壳：
//! - 不带参数: 列出已发布展览的第一页
//! - 带 slug 参数: 加载该展览并打印栏目/内容块大纲（图书块展示解析后的元数据）

use std::sync::Arc;

use vitrina::application::ports::ExhibitionPageQuery;
use vitrina::application::store::{BookResolver, ExhibitionStore};
use vitrina::application::{ExhibitionCatalog, ExhibitionEditor};
use vitrina::config::{load_config, print_config};
use vitrina::domain::exhibition::{BlockKind, Slug};
use vitrina::infrastructure::{
    HttpAdminGateway, HttpExhibitionGateway, HttpLibraryGateway, RestClient, RestClientConfig,
    TerminalConfirmation,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    // 初始化日志
    let log_filter = format!("{},vitrina={}", config.log.level, config.log.level);
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter)),
        )
        .init();

    tracing::info!("Vitrina - 图书馆虚拟展览前端核心");
    print_config(&config);

    // 组装网关
    let client_config = RestClientConfig::new(&config.backend.base_url)
        .with_timeout(config.backend.timeout_secs);
    let client = Arc::new(
        RestClient::new(client_config).map_err(|e| anyhow::anyhow!("HTTP client: {}", e))?,
    );
    let exhibitions = Arc::new(HttpExhibitionGateway::new(client.clone()));
    let library = Arc::new(HttpLibraryGateway::new(client.clone()));
    let _admin = Arc::new(HttpAdminGateway::new(client));
    let confirmation = Arc::new(TerminalConfirmation::new());

    match std::env::args().nth(1) {
        Some(slug) => {
            let slug = Slug::new(slug).map_err(|e| anyhow::anyhow!("{}", e))?;
            show_exhibition(slug, exhibitions, library, confirmation).await
        }
        None => list_published(exhibitions, confirmation, config.search.page_size).await,
    }
}

/// 列出已发布展览的第一页
async fn list_published(
    gateway: Arc<HttpExhibitionGateway>,
    confirmation: Arc<TerminalConfirmation>,
    page_size: u32,
) -> anyhow::Result<()> {
    let mut query = ExhibitionPageQuery::new(1, page_size);
    query.published = Some(true);
    let catalog = ExhibitionCatalog::new(gateway, confirmation, query);

    catalog
        .load()
        .await
        .map_err(|e| anyhow::anyhow!("{}", e.user_message()))?;

    println!(
        "Выставки (стр. {}/{}, всего {})",
        catalog.page(),
        catalog.total_pages(),
        catalog.total()
    );
    for item in catalog.items() {
        let marker = if item.is_published { "+" } else { "-" };
        println!("  [{marker}] {}  /exhibitions/{}", item.title, item.slug);
    }
    Ok(())
}

/// 加载单个展览并打印大纲
async fn show_exhibition(
    slug: Slug,
    gateway: Arc<HttpExhibitionGateway>,
    library: Arc<HttpLibraryGateway>,
    confirmation: Arc<TerminalConfirmation>,
) -> anyhow::Result<()> {
    let store = Arc::new(ExhibitionStore::new());
    let resolver = Arc::new(BookResolver::new(library));
    let editor = ExhibitionEditor::new(slug, gateway, store, resolver, confirmation);

    editor
        .load()
        .await
        .map_err(|e| anyhow::anyhow!("{}", e.user_message()))?;

    let Some(exhibition) = editor.store().snapshot() else {
        anyhow::bail!("Exhibition is not loaded");
    };

    println!("{} ({})", exhibition.title, exhibition.slug);
    if let Some(description) = &exhibition.description {
        println!("{description}");
    }
    for section in &exhibition.sections {
        println!("== {}", section.title);
        for block in &section.content_blocks {
            match block.kind {
                BlockKind::Text => {
                    let text = block.text_content.as_deref().unwrap_or_default();
                    println!("  [текст] {}", text);
                }
                BlockKind::Book => match block.book_id.and_then(|id| editor.resolver().get(id)) {
                    Some(info) => println!(
                        "  [книга] {} ({})",
                        info.title,
                        info.authors.join(", ")
                    ),
                    None => println!("  [книга] id={:?} (не найдена)", block.book_id),
                },
            }
        }
    }
    Ok(())
}
