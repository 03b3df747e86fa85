//! Session commands: login, logout, register.

use vitrine_client::Storefront;

pub async fn login(
    storefront: &Storefront,
    username: &str,
    password: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let user = storefront.login(username, password).await?;
    println!("Logged in as {}", user.username);

    let cart = storefront.cart();
    let count = cart.item_count();
    if count > 0 {
        println!("Cart: {} item(s), total {}", count, cart.total());
    }
    Ok(())
}

pub fn logout(storefront: &Storefront) {
    storefront.logout();
    println!("Logged out");
}

pub async fn register(
    storefront: &Storefront,
    username: &str,
    email: &str,
    password: &str,
    full_name: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let user = storefront
        .register(username, email, password, full_name)
        .await?;
    println!("Registered {} <{}>", user.username, user.email);
    println!("Run `vitrine login {}` to sign in", user.username);
    Ok(())
}
