pub fn markdown_fixture() -> &'static str {
    return r#"
Great, let's build an audience!

Which of these would you like to target?

- Shoppers who bought **organic** produce in the last 30 days
- Loyalty members in the North West

```sql
SELECT customer_id FROM purchases WHERE category = 'organic';
```

Reply with a number to continue.
"#
    .trim();
}
