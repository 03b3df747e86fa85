//! Catalog commands: categories, products, product.

use vitrine_client::Storefront;
use vitrine_core::CategoryId;

pub async fn categories(storefront: &Storefront) -> Result<(), Box<dyn std::error::Error>> {
    let categories = storefront.api().categories().await?;

    if categories.is_empty() {
        println!("No categories found");
        return Ok(());
    }

    for category in categories {
        match category.description {
            Some(description) => println!("{:>4}  {} - {}", category.id, category.name, description),
            None => println!("{:>4}  {}", category.id, category.name),
        }
    }
    Ok(())
}

pub async fn products(
    storefront: &Storefront,
    category: Option<i32>,
) -> Result<(), Box<dyn std::error::Error>> {
    let products = storefront
        .api()
        .products(category.map(CategoryId::new))
        .await?;

    if products.is_empty() {
        println!("No products found");
        return Ok(());
    }

    for product in products {
        println!(
            "{:>4}  {:<40} {:>10}  stock: {}",
            product.id, product.name, product.price, product.stock
        );
    }
    Ok(())
}

pub async fn product(storefront: &Storefront, id: i32) -> Result<(), Box<dyn std::error::Error>> {
    let product = storefront.api().product(id.into()).await?;

    println!("{} (#{})", product.name, product.id);
    println!("  Price:    {}", product.price);
    println!("  Stock:    {}", product.stock);
    println!("  Category: {}", product.category_id);
    if !product.description.is_empty() {
        println!("  {}", product.description);
    }
    Ok(())
}
