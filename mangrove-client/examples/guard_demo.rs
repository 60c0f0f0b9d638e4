// mangrove-client/examples/guard_demo.rs
// 登录 + 路由守卫示例

use mangrove_client::{ClientConfig, GuardDecision, Permission, Role, RouteGuard};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 4 {
        println!("Usage: {} <base_url> <username> <password>", args[0]);
        println!(
            "  Example: {} http://localhost:8080 employee1 password123",
            args[0]
        );
        return Ok(());
    }

    let base_url = &args[1];
    let username = &args[2];
    let password = &args[3];

    // 凭证目录（设置后支持重启恢复会话）
    let credential_dir = std::env::var("MANGROVE_CREDENTIAL_DIR")
        .unwrap_or_else(|_| "./credentials".to_string());

    let config = ClientConfig::new(base_url).with_credential_dir(&credential_dir);
    let session = config.build_session_manager()?;

    // 尝试恢复已有会话，否则登录
    session.restore_session().await;
    if !session.current().is_authenticated() {
        if let Err(e) = session.login(username, password).await {
            tracing::error!("Failed to login: {}", e);
            return Err(e.into());
        }
    }

    if let Some(user) = session.current().user() {
        tracing::info!("Logged in as: {} ({})", user.username, user.role);
    }

    // 逐条评估典型路由
    let state = session.current();
    let routes = [
        ("/home", RouteGuard::new()),
        ("/menu", RouteGuard::permission(Permission::MenuManage)),
        ("/kitchen", RouteGuard::permission(Permission::KitchenView)),
        ("/reports", RouteGuard::permission(Permission::ReportsView)),
        ("/users", RouteGuard::permission(Permission::UsersManage)),
        (
            "/settings",
            RouteGuard::new().with_roles([Role::Admin, Role::Manager]),
        ),
    ];

    for (path, guard) in &routes {
        match guard.evaluate(&state, path) {
            GuardDecision::Allowed => println!("{path:12} allowed"),
            decision => println!("{path:12} {decision}"),
        }
    }

    session.logout().await;
    tracing::info!("Logged out");

    Ok(())
}
